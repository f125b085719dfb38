//! Phased rollout of resolved pools to the cluster scheduler.
//!
//! `deploy` runs the full sequence: resolve pools, translate them,
//! canary-validate where configured, then apply the real update and
//! wait for the scheduler to confirm it. Pools are processed one at a
//! time in sorted instance-id order; there is no rollback of pools
//! that were already applied when a later one fails.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time;
use tracing::{debug, error, info, warn};

use skylift_config::{
    resolve_pools, ConfigError, DeploySettings, Environment, Mode, PoolConfig, ServiceConfig,
};
use skylift_marathon::{AppSpec, Scheduler, SchedulerError};

use crate::diff::render_diff;
use crate::error::{DeployError, DeployPhase, DeployResult};
use crate::translate::{canary_spec, pool_to_spec};
use crate::varz::CanaryProbe;
use crate::waiter::DeploymentWaiter;

/// Drives phased rollouts for one service against one environment.
///
/// The deployer is bound to an environment at construction; a deploy
/// request for any other environment is rejected before a single
/// scheduler call is made.
pub struct Deployer<S, P> {
    scheduler: S,
    probe: P,
    service: ServiceConfig,
    settings: DeploySettings,
    binding: Environment,
}

impl<S: Scheduler, P: CanaryProbe> Deployer<S, P> {
    /// Settings are validated here, once; translation relies on those
    /// invariants afterwards.
    pub fn new(
        scheduler: S,
        probe: P,
        service: ServiceConfig,
        settings: DeploySettings,
        binding: Environment,
    ) -> DeployResult<Self> {
        settings.validate()?;
        Ok(Self {
            scheduler,
            probe,
            service,
            settings,
            binding,
        })
    }

    /// Translate one resolved pool without touching the scheduler.
    pub fn pool_to_spec(
        &self,
        tag: &str,
        instance_id: &str,
        pool: &PoolConfig,
        environment: Environment,
    ) -> AppSpec {
        pool_to_spec(
            tag,
            instance_id,
            pool,
            environment,
            &self.service,
            &self.settings,
        )
    }

    /// Resolve and translate every pool for `environment` — the
    /// read-only preview used for dry runs.
    pub fn preview(
        &self,
        tag: &str,
        environment: Environment,
    ) -> DeployResult<BTreeMap<String, AppSpec>> {
        let pools = resolve_pools(&self.service.pools, environment)?;
        Ok(pools
            .iter()
            .map(|(id, pool)| (id.clone(), self.pool_to_spec(tag, id, pool, environment)))
            .collect())
    }

    /// Perform a phased deployment of `tag` to `environment`.
    ///
    /// `Full` runs canary validation and then the real update; `Canary`
    /// stops after validation; `Fast` skips validation entirely.
    pub async fn deploy(&self, tag: &str, environment: Environment, mode: Mode) -> DeployResult<()> {
        self.check_binding(environment)?;
        let pools = resolve_pools(&self.service.pools, environment)?;
        let specs: Vec<(PoolConfig, AppSpec)> = pools
            .into_iter()
            .map(|(id, pool)| {
                let spec = self.pool_to_spec(tag, &id, &pool, environment);
                (pool, spec)
            })
            .collect();

        info!(
            tag,
            environment = %environment,
            mode = %mode,
            pools = specs.len(),
            "starting deploy"
        );
        let outcome = self.run_phases(mode, &specs).await;
        match &outcome {
            Ok(()) => info!(tag, environment = %environment, "deploy complete"),
            Err(failure) => report_failure(failure),
        }
        outcome
    }

    async fn run_phases(&self, mode: Mode, specs: &[(PoolConfig, AppSpec)]) -> DeployResult<()> {
        if mode != Mode::Fast {
            for (pool, spec) in specs {
                if pool.use_canary {
                    self.canary_deploy(spec).await?;
                }
            }
        }
        if mode != Mode::Canary {
            for (_, spec) in specs {
                self.update_pool(spec).await?;
            }
        }
        Ok(())
    }

    /// Canary sub-protocol. Teardown is guaranteed: whatever happens
    /// after placement starts — timeout, failed validation, API error —
    /// the canary is deleted exactly once before this returns.
    async fn canary_deploy(&self, spec: &AppSpec) -> DeployResult<()> {
        let canary = canary_spec(spec);
        info!(app = %canary.id, "starting canary deployment");
        let outcome = self.run_canary(&canary).await;
        let teardown = self.ensure_deleted(&canary.id).await;
        match outcome {
            Ok(()) => teardown,
            Err(failure) => {
                if let Err(teardown_failure) = teardown {
                    warn!(
                        app = %canary.id,
                        error = %teardown_failure,
                        "canary teardown failed after canary error"
                    );
                }
                Err(failure)
            }
        }
    }

    async fn run_canary(&self, canary: &AppSpec) -> DeployResult<()> {
        self.update_and_wait(canary, DeployPhase::Canary).await?;

        let state = self
            .scheduler
            .get_app(&canary.id)
            .await
            .map_err(|e| self.api_error(&canary.id, DeployPhase::Canary, None, e))?;
        let task = state.as_ref().and_then(|s| s.tasks.first()).ok_or_else(|| {
            DeployError::CanaryNotRunning {
                app_id: canary.id.clone(),
            }
        })?;
        let host = task.host.clone();
        let mut ports = task.ports.clone();

        let interval = Duration::from_secs(self.settings.canary_check_interval);
        for check in 0..self.settings.canary_check_count {
            time::sleep(interval).await;
            let port = self.probe.check(&host, &ports).await?;
            debug!(app = %canary.id, check, port, "canary status check passed");
            // Later checks go straight to the port that answered.
            ports = vec![port];
        }
        Ok(())
    }

    /// Full/fast update sub-protocol for one pool.
    async fn update_pool(&self, spec: &AppSpec) -> DeployResult<()> {
        info!(app = %spec.id, "updating application");
        let before = self
            .scheduler
            .get_app(&spec.id)
            .await
            .map_err(|e| self.api_error(&spec.id, DeployPhase::Update, Some(spec), e))?;
        let handle = self
            .scheduler
            .update_app(&spec.id, spec)
            .await
            .map_err(|e| self.api_error(&spec.id, DeployPhase::Update, Some(spec), e))?;
        let after = self
            .scheduler
            .get_app(&spec.id)
            .await
            .map_err(|e| self.api_error(&spec.id, DeployPhase::Update, Some(spec), e))?;
        // Operator-facing only; the diff never affects control flow.
        info!(
            app = %spec.id,
            changes = %render_diff(before.as_ref(), after.as_ref()),
            "applied update"
        );
        self.waiter().wait(&self.scheduler, &handle).await
    }

    async fn update_and_wait(&self, spec: &AppSpec, phase: DeployPhase) -> DeployResult<()> {
        let handle = self
            .scheduler
            .update_app(&spec.id, spec)
            .await
            .map_err(|e| self.api_error(&spec.id, phase, Some(spec), e))?;
        self.waiter().wait(&self.scheduler, &handle).await
    }

    /// Idempotent teardown: deleting an app that is already gone is
    /// success.
    async fn ensure_deleted(&self, app_id: &str) -> DeployResult<()> {
        let deleted = self
            .scheduler
            .delete_app(app_id)
            .await
            .map_err(|e| self.api_error(app_id, DeployPhase::Teardown, None, e))?;
        match deleted {
            Some(handle) => self.waiter().wait(&self.scheduler, &handle).await,
            None => {
                debug!(app = %app_id, "app already absent");
                Ok(())
            }
        }
    }

    fn waiter(&self) -> DeploymentWaiter {
        DeploymentWaiter::new(Duration::from_secs(self.settings.deploy_timeout))
    }

    fn check_binding(&self, environment: Environment) -> DeployResult<()> {
        if environment != self.binding {
            return Err(ConfigError::EnvironmentMismatch {
                bound: self.binding,
                requested: environment,
            }
            .into());
        }
        Ok(())
    }

    fn api_error(
        &self,
        app_id: &str,
        phase: DeployPhase,
        attempted: Option<&AppSpec>,
        source: SchedulerError,
    ) -> DeployError {
        DeployError::Scheduler {
            app_id: app_id.to_string(),
            phase,
            attempted: attempted.map(|spec| Box::new(spec.clone())),
            source,
        }
    }
}

/// Surface a failed deploy with enough context to diagnose without
/// re-running; scheduler failures include the spec we tried to apply.
fn report_failure(failure: &DeployError) {
    if let DeployError::Scheduler {
        app_id,
        phase,
        attempted: Some(spec),
        source,
    } = failure
    {
        let rendered = serde_json::to_string_pretty(spec.as_ref()).unwrap_or_default();
        error!(
            app = %app_id,
            phase = %phase,
            error = %source,
            spec = %rendered,
            "deploy failed"
        );
    } else {
        error!(error = %failure, "deploy failed");
    }
}
