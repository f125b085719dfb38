//! Per-instance pool configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default health probe command. `${HOST}` and `${PORT1}` are
/// substituted by the scheduler at task launch, not by us.
pub const DEFAULT_HEALTH_COMMAND: &str =
    "test \\$(curl -sw '%{http_code}' http://${HOST}:${PORT1}/healthz -o /dev/null) -eq 200";

/// Largest permitted `instance_size`.
pub const MAX_INSTANCE_SIZE: u32 = 64;

/// Placement group an instance pool belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceGroup {
    Backend,
    Common,
}

impl InstanceGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceGroup::Backend => "Backend",
            InstanceGroup::Common => "Common",
        }
    }
}

/// Which HAProxy group routes traffic to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HaproxyGroup {
    Internal,
    External,
}

impl Default for HaproxyGroup {
    fn default() -> Self {
        HaproxyGroup::Internal
    }
}

impl HaproxyGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            HaproxyGroup::Internal => "internal",
            HaproxyGroup::External => "external",
        }
    }
}

/// Health-check parameters for a pool. Missing fields take the
/// documented defaults (0/15/10/6 seconds and the HTTP-200 probe).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    pub grace_period_seconds: u32,
    pub interval_seconds: u32,
    pub timeout_seconds: u32,
    pub max_consecutive_failures: u32,
    pub command: String,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            grace_period_seconds: 0,
            interval_seconds: 15,
            timeout_seconds: 10,
            max_consecutive_failures: 6,
            command: DEFAULT_HEALTH_COMMAND.to_string(),
        }
    }
}

/// Declarative spec for one pool of identical instances, resolved per
/// (environment, instance id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Resource multiplier: cpus and memory scale linearly with this.
    pub instance_size: u32,
    /// Number of instances to run.
    pub instances: u32,
    pub instance_group: InstanceGroup,
    #[serde(default = "default_true")]
    pub one_per_host: bool,
    #[serde(default = "default_true")]
    pub use_canary: bool,
    /// Container hostname override; defaults to the last segment of the
    /// service id when absent.
    #[serde(default)]
    pub hostname: Option<String>,
    /// VIP label → host/IP, attached to every port mapping.
    #[serde(default)]
    pub vips: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub health_check: HealthCheckConfig,
    #[serde(default)]
    pub haproxy_group: HaproxyGroup,
}

impl PoolConfig {
    /// Bounds checks applied once when the pool is resolved.
    pub fn validate(&self, instance_id: &str) -> ConfigResult<()> {
        if self.instance_size == 0 || self.instance_size > MAX_INSTANCE_SIZE {
            return Err(ConfigError::InvalidPool {
                instance_id: instance_id.to_string(),
                reason: format!(
                    "instance_size must be in 1..={MAX_INSTANCE_SIZE}, got {}",
                    self.instance_size
                ),
            });
        }
        Ok(())
    }

    /// The VIP label map, empty when no VIPs are configured.
    pub fn vip_labels(&self) -> BTreeMap<String, String> {
        self.vips.clone().unwrap_or_default()
    }
}

fn default_true() -> bool {
    true
}
