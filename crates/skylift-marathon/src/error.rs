//! Scheduler client error types.

use serde_json::Value;
use thiserror::Error;

/// Errors from talking to the cluster scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Transport-level failure after exhausting every configured host.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The scheduler answered with a non-success status. The structured
    /// error body is kept for diagnostics.
    #[error("scheduler API error ({status}): {details}")]
    Api { status: u16, details: Value },

    #[error("no scheduler hosts configured")]
    NoHosts,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
