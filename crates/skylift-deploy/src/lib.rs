//! skylift-deploy — phased deployment of service pools.
//!
//! Takes a service's resolved pool configuration and drives it onto a
//! Marathon-style cluster scheduler: translate each pool into an app
//! spec, optionally place and validate a single-instance canary, roll
//! out the full update, and confirm every asynchronous scheduler-side
//! deployment through bounded polling.
//!
//! Control flow is strictly sequential by design — pools one at a
//! time, canary before full — because concurrent mutation of the same
//! scheduler namespace is unsafe without locking the scheduler does
//! not provide.
//!
//! # Components
//!
//! - **`translate`** — pool config → app spec (pure)
//! - **`orchestrator`** — canary/full/fast rollout sequencing
//! - **`waiter`** — backoff-scheduled polling of in-flight deployments
//! - **`varz`** — canary health validation against the varz endpoint
//! - **`diff`** — before/after app-state rendering for operators

pub mod diff;
pub mod error;
pub mod orchestrator;
pub mod translate;
pub mod varz;
pub mod waiter;

#[cfg(test)]
pub(crate) mod testutil;

pub use diff::render_diff;
pub use error::{DeployError, DeployPhase, DeployResult};
pub use orchestrator::Deployer;
pub use translate::{canary_spec, pool_to_spec, CANARY_SUFFIX};
pub use varz::{error_counters, CanaryProbe, HttpVarzFetcher, VarzFetch, VarzValidator};
pub use waiter::{BackoffSchedule, DeploymentWaiter};
