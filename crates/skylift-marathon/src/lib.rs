//! skylift-marathon — Marathon-style scheduler client.
//!
//! Wire model and REST client for the cluster scheduler. The
//! [`Scheduler`] trait is the seam the deployer programs against;
//! [`MarathonClient`] is the production implementation, speaking the
//! `/v2` HTTP API with ordered-host failover.
//!
//! "Absent" is modeled as `None` throughout — `get_app` on an unknown
//! id and `delete_app` on an already-deleted app are not errors.
//!
//! # Components
//!
//! - **`app`** — application specification submitted to the scheduler
//! - **`state`** — application state, tasks, and in-flight deployments
//! - **`client`** — the `Scheduler` trait and HTTP implementation

pub mod app;
pub mod client;
pub mod error;
pub mod state;

pub use app::{
    AppSpec, CommandSpec, Constraint, Container, DockerParameter, DockerSpec, HealthCheck,
    PortMapping, UpgradeStrategy,
};
pub use client::{MarathonClient, Scheduler};
pub use error::{SchedulerError, SchedulerResult};
pub use state::{AppState, DeploymentHandle, DeploymentInfo, TaskState};
