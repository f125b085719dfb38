//! Configuration error types.

use thiserror::Error;

use crate::types::Environment;

/// Errors raised while typing or resolving configuration. None of these
/// are retryable; they are surfaced before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no pools configured for environment {0}")]
    NoPoolsForEnvironment(Environment),

    #[error("no scheduler hosts configured for environment {0}")]
    NoHostsForEnvironment(Environment),

    #[error("cannot deploy to {requested} with a client bound to {bound}")]
    EnvironmentMismatch {
        bound: Environment,
        requested: Environment,
    },

    #[error("unknown environment {0:?}, expected stage or live")]
    UnknownEnvironment(String),

    #[error("mode must be one of full, canary or fast, got {0:?}")]
    UnknownMode(String),

    #[error("invalid pool config for {instance_id}: {reason}")]
    InvalidPool { instance_id: String, reason: String },

    #[error("invalid VIP declaration {decl:?}: {reason}")]
    InvalidVip { decl: String, reason: String },

    #[error("invalid deploy settings: {0}")]
    InvalidSettings(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
