//! skylift-config — typed deployment configuration.
//!
//! Everything the deployer consumes arrives here as validated, strongly
//! typed values: per-environment pool declarations, environment-wide
//! deploy settings, and the scheduler host map. Validation of the raw
//! YAML happens upstream; this crate types the result once at the
//! boundary so the core never operates on loose key/value trees.
//!
//! # Components
//!
//! - **`types`** — environment and deploy-mode tags
//! - **`pool`** — per-instance pool configuration
//! - **`resolve`** — default + per-environment override resolution
//! - **`site`** — environment-wide deploy settings and scheduler hosts
//! - **`vip`** — VIP declaration expansion (`host[001-016]` ranges)

pub mod error;
pub mod pool;
pub mod resolve;
pub mod site;
pub mod types;
pub mod vip;

pub use error::{ConfigError, ConfigResult};
pub use pool::{
    HaproxyGroup, HealthCheckConfig, InstanceGroup, PoolConfig, DEFAULT_HEALTH_COMMAND,
};
pub use resolve::{resolve_pools, PoolsConfig};
pub use site::{DeploySettings, EnvironmentHosts, ServiceConfig, SiteConfig};
pub use types::{Environment, Mode};
pub use vip::expand_vips;
