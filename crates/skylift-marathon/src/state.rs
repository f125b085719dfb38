//! Application state and in-flight deployments, as reported by the
//! scheduler.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// State of a deployed application.
///
/// Only the fields the deployer inspects are typed; everything else the
/// scheduler reports (versions, counts, timestamps — already ISO-8601
/// strings on the wire) is preserved verbatim in `rest` so before/after
/// diffs show the complete object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub tasks: Vec<TaskState>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// A running task of an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskState {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub ports: Vec<u16>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// One entry from the scheduler's in-flight deployment list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentInfo {
    pub id: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Opaque identifier for an asynchronous scheduler-side change,
/// returned by every mutating call. Valid only until the deployment
/// leaves the in-flight list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentHandle {
    #[serde(rename = "deploymentId")]
    pub id: String,
}
