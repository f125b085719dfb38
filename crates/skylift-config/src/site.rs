//! Environment-wide deploy settings and per-service configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::resolve::PoolsConfig;
use crate::types::Environment;

/// Deploy knobs shared by every service in a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploySettings {
    /// Overall bound on waiting for a single scheduler deployment, in
    /// seconds.
    pub deploy_timeout: u64,
    /// How many times the canary is health-checked before promotion.
    pub canary_check_count: u32,
    /// Sleep between canary health checks, in seconds.
    pub canary_check_interval: u64,
    /// CPUs granted per unit of `instance_size`.
    pub cpu_slice: f64,
    /// Memory (MiB) granted per unit of `instance_size`.
    pub mem_slice: f64,
    /// Image registry prefix, e.g. `registry.example.com:5000/apps`.
    pub registry: String,
}

impl DeploySettings {
    /// Checked once at deployer construction; the translator relies on
    /// these invariants afterwards.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.cpu_slice <= 0.0 {
            return Err(ConfigError::InvalidSettings(format!(
                "cpu_slice must be positive, got {}",
                self.cpu_slice
            )));
        }
        if self.mem_slice <= 0.0 {
            return Err(ConfigError::InvalidSettings(format!(
                "mem_slice must be positive, got {}",
                self.mem_slice
            )));
        }
        if self.deploy_timeout == 0 {
            return Err(ConfigError::InvalidSettings(
                "deploy_timeout must be positive".to_string(),
            ));
        }
        if self.registry.is_empty() {
            return Err(ConfigError::InvalidSettings(
                "registry must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Scheduler API endpoints for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentHosts {
    pub hosts: Vec<String>,
}

/// Site-level deploy configuration: shared settings plus the scheduler
/// host list per environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub defaults: DeploySettings,
    pub environments: BTreeMap<Environment, EnvironmentHosts>,
}

impl SiteConfig {
    /// Scheduler hosts for `environment`.
    pub fn hosts(&self, environment: Environment) -> ConfigResult<&[String]> {
        self.environments
            .get(&environment)
            .map(|e| e.hosts.as_slice())
            .ok_or(ConfigError::NoHostsForEnvironment(environment))
    }
}

/// The slice of a service's validated configuration the deployer needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Logical service name; also the image repository name.
    pub name: String,
    /// Ports the service listens on, in declaration order.
    pub ports: Vec<u16>,
    #[serde(default)]
    pub pools: PoolsConfig,
}
