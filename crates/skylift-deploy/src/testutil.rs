//! Shared in-memory fakes for orchestrator and waiter tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use skylift_marathon::{
    AppSpec, AppState, DeploymentHandle, DeploymentInfo, Scheduler, SchedulerError,
    SchedulerResult,
};

use crate::error::{DeployError, DeployResult};
use crate::varz::CanaryProbe;

#[derive(Default)]
struct SchedulerState {
    calls: Vec<String>,
    apps: HashMap<String, AppState>,
    /// Handle ids that never leave the in-flight list.
    in_flight: HashSet<String>,
    /// Handle id → number of listings it still appears in.
    clear_after: HashMap<String, u32>,
    list_failures: u32,
    fail_update_for: Option<String>,
    apps_without_tasks: HashSet<String>,
    /// App ids whose update handles never clear.
    stuck_apps: HashSet<String>,
    handle_counter: u32,
}

/// Scripted in-memory scheduler. Deployments complete instantly unless
/// configured otherwise; every app call is recorded as `"verb app-id"`.
#[derive(Clone, Default)]
pub(crate) struct FakeScheduler {
    state: Arc<Mutex<SchedulerState>>,
}

impl FakeScheduler {
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// Park `handle_id` in the in-flight list forever.
    pub fn stick_handle(&self, handle_id: &str) {
        self.state
            .lock()
            .unwrap()
            .in_flight
            .insert(handle_id.to_string());
    }

    /// `handle_id` appears in the next `listings` listings, then
    /// clears.
    pub fn clear_handle_after(&self, handle_id: &str, listings: u32) {
        self.state
            .lock()
            .unwrap()
            .clear_after
            .insert(handle_id.to_string(), listings);
    }

    /// Fail the next `n` deployment listings.
    pub fn fail_listings(&self, n: u32) {
        self.state.lock().unwrap().list_failures = n;
    }

    /// Serve an API error for updates of `app_id`.
    pub fn fail_update_for(&self, app_id: &str) {
        self.state.lock().unwrap().fail_update_for = Some(app_id.to_string());
    }

    /// Updates of `app_id` return handles that never clear.
    pub fn stick_app_deployments(&self, app_id: &str) {
        self.state
            .lock()
            .unwrap()
            .stuck_apps
            .insert(app_id.to_string());
    }

    /// Updates of `app_id` place an app with no running tasks.
    pub fn place_without_tasks(&self, app_id: &str) {
        self.state
            .lock()
            .unwrap()
            .apps_without_tasks
            .insert(app_id.to_string());
    }

    fn running_state(app_id: &str, with_tasks: bool) -> AppState {
        let tasks = if with_tasks {
            json!([{ "id": "task-1", "host": "10.0.1.7", "ports": [31001, 31002] }])
        } else {
            json!([])
        };
        serde_json::from_value(json!({ "id": app_id, "tasks": tasks })).unwrap()
    }
}

#[async_trait]
impl Scheduler for FakeScheduler {
    async fn get_app(&self, app_id: &str) -> SchedulerResult<Option<AppState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("get {app_id}"));
        Ok(state.apps.get(app_id).cloned())
    }

    async fn update_app(&self, app_id: &str, _spec: &AppSpec) -> SchedulerResult<DeploymentHandle> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("update {app_id}"));
        if state.fail_update_for.as_deref() == Some(app_id) {
            return Err(SchedulerError::Api {
                status: 409,
                details: json!({ "message": "App is locked by one or more deployments" }),
            });
        }
        let with_tasks = !state.apps_without_tasks.contains(app_id);
        let app_state = Self::running_state(app_id, with_tasks);
        state.apps.insert(app_id.to_string(), app_state);
        state.handle_counter += 1;
        let handle_id = format!("deploy-{}", state.handle_counter);
        if state.stuck_apps.contains(app_id) {
            state.in_flight.insert(handle_id.clone());
        }
        Ok(DeploymentHandle { id: handle_id })
    }

    async fn delete_app(&self, app_id: &str) -> SchedulerResult<Option<DeploymentHandle>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete {app_id}"));
        if state.apps.remove(app_id).is_none() {
            return Ok(None);
        }
        state.handle_counter += 1;
        let handle_id = format!("deploy-{}", state.handle_counter);
        Ok(Some(DeploymentHandle { id: handle_id }))
    }

    async fn list_deployments(&self) -> SchedulerResult<Vec<DeploymentInfo>> {
        let mut state = self.state.lock().unwrap();
        if state.list_failures > 0 {
            state.list_failures -= 1;
            return Err(SchedulerError::Other(anyhow::anyhow!("listing failed")));
        }
        let mut ids: Vec<String> = state.in_flight.iter().cloned().collect();
        for (id, remaining) in state.clear_after.iter_mut() {
            if *remaining > 0 {
                ids.push(id.clone());
                *remaining -= 1;
            }
        }
        Ok(ids
            .into_iter()
            .map(|id| DeploymentInfo {
                id,
                rest: Default::default(),
            })
            .collect())
    }
}

enum ProbeBehavior {
    Pass,
    FailCounters(Vec<String>),
    FailNetwork,
}

/// Scripted canary probe; records every check.
#[derive(Clone)]
pub(crate) struct FakeProbe {
    behavior: Arc<ProbeBehavior>,
    calls: Arc<Mutex<Vec<(String, Vec<u16>)>>>,
}

impl FakeProbe {
    pub fn passing() -> Self {
        Self::with_behavior(ProbeBehavior::Pass)
    }

    pub fn failing_counters(counters: &[&str]) -> Self {
        Self::with_behavior(ProbeBehavior::FailCounters(
            counters.iter().map(|c| c.to_string()).collect(),
        ))
    }

    pub fn failing_network() -> Self {
        Self::with_behavior(ProbeBehavior::FailNetwork)
    }

    fn with_behavior(behavior: ProbeBehavior) -> Self {
        Self {
            behavior: Arc::new(behavior),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<u16>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CanaryProbe for FakeProbe {
    async fn check(&self, host: &str, ports: &[u16]) -> DeployResult<u16> {
        self.calls
            .lock()
            .unwrap()
            .push((host.to_string(), ports.to_vec()));
        match self.behavior.as_ref() {
            ProbeBehavior::Pass => ports
                .first()
                .copied()
                .ok_or_else(|| DeployError::VarzNetworkErrors { failures: vec![] }),
            ProbeBehavior::FailCounters(counters) => Err(DeployError::VarzErrors {
                counters: counters.clone(),
            }),
            ProbeBehavior::FailNetwork => Err(DeployError::VarzNetworkErrors {
                failures: vec![format!("{host}: connection refused")],
            }),
        }
    }
}
