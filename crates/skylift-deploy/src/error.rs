//! Deployment error taxonomy.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use skylift_config::ConfigError;
use skylift_marathon::{AppSpec, SchedulerError};

/// Rollout phase a failure occurred in, attached to scheduler errors
/// for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployPhase {
    Canary,
    Update,
    Teardown,
}

impl DeployPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployPhase::Canary => "canary",
            DeployPhase::Update => "update",
            DeployPhase::Teardown => "teardown",
        }
    }
}

impl fmt::Display for DeployPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while deploying.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Configuration problem — surfaced before any scheduler call.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A deployment handle did not clear within the configured window.
    #[error("deployment {id} did not finish within {timeout:?}")]
    Timeout { id: String, timeout: Duration },

    /// Canary health validation found non-zero error counters.
    #[error("canary error counters are non-zero: {}", .counters.join(", "))]
    VarzErrors { counters: Vec<String> },

    /// The canary's varz endpoint was unreachable on every candidate
    /// port.
    #[error("varz endpoint unreachable on every candidate port: {}", .failures.join("; "))]
    VarzNetworkErrors { failures: Vec<String> },

    /// The canary was placed but reported no running task to probe.
    #[error("canary {app_id} has no running task to probe")]
    CanaryNotRunning { app_id: String },

    /// Unexpected scheduler API failure. Aborts the remaining rollout
    /// sequence; already-applied pools are not rolled back.
    #[error("scheduler API error for {app_id} during {phase}: {source}")]
    Scheduler {
        app_id: String,
        phase: DeployPhase,
        /// The spec we attempted to apply, kept for operator
        /// inspection.
        attempted: Option<Box<AppSpec>>,
        #[source]
        source: SchedulerError,
    },

    /// HTTP client construction failed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type DeployResult<T> = Result<T, DeployError>;
