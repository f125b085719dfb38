//! Environment and deploy-mode tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Target environment for a deployment.
///
/// A deployer is bound to exactly one environment at construction; the
/// binding is checked against the requested environment before any
/// scheduler call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Stage,
    Live,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Stage => "stage",
            Environment::Live => "live",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stage" => Ok(Environment::Stage),
            "live" => Ok(Environment::Live),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// Rollout mode for a single deploy invocation.
///
/// - `Full` — canary validation, then a full update.
/// - `Canary` — canary validation only; base apps are left untouched.
/// - `Fast` — full update only, skipping canary validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Full,
    Canary,
    Fast,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Full => "full",
            Mode::Canary => "canary",
            Mode::Fast => "fast",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Mode::Full),
            "canary" => Ok(Mode::Canary),
            "fast" => Ok(Mode::Fast),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}
