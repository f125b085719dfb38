//! Application specification submitted to the scheduler.
//!
//! Field names follow the scheduler's camelCase wire format exactly;
//! these structs serialize to the JSON the `/v2/apps` endpoint expects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A complete application definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSpec {
    pub id: String,
    /// Always `null` for container apps; the image entrypoint runs.
    pub cmd: Option<String>,
    pub instances: u32,
    pub cpus: f64,
    pub mem: f64,
    pub container: Container,
    pub constraints: Vec<Constraint>,
    pub labels: BTreeMap<String, String>,
    pub health_checks: Vec<HealthCheck>,
    pub upgrade_strategy: UpgradeStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(rename = "type")]
    pub container_type: String,
    pub docker: DockerSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerSpec {
    /// Tag-qualified image reference.
    pub image: String,
    pub network: String,
    pub port_mappings: Vec<PortMapping>,
    pub parameters: Vec<DockerParameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    pub container_port: u16,
    /// VIP label → `host:port` routing hints.
    pub labels: BTreeMap<String, String>,
}

/// `docker run` flag passed through verbatim, e.g. `hostname`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockerParameter {
    pub key: String,
    pub value: String,
}

/// Placement constraint, wire format `[field, operator, value?]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constraint(pub Vec<String>);

impl Constraint {
    /// Pin all instances to hosts sharing `value` for `field`.
    pub fn cluster(field: &str, value: &str) -> Self {
        Constraint(vec![
            field.to_string(),
            "CLUSTER".to_string(),
            value.to_string(),
        ])
    }

    /// At most one instance per distinct value of `field`.
    pub fn unique(field: &str) -> Self {
        Constraint(vec![field.to_string(), "UNIQUE".to_string()])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    pub protocol: String,
    pub command: CommandSpec,
    pub grace_period_seconds: u32,
    pub interval_seconds: u32,
    pub timeout_seconds: u32,
    pub max_consecutive_failures: u32,
    pub ignore_http1xx: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeStrategy {
    /// Extra instances allowed over capacity while a rollout replaces
    /// the old version.
    pub maximum_over_capacity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constraint_wire_format() {
        assert_eq!(
            serde_json::to_value(Constraint::cluster("Group", "Backend")).unwrap(),
            json!(["Group", "CLUSTER", "Backend"])
        );
        assert_eq!(
            serde_json::to_value(Constraint::unique("hostname")).unwrap(),
            json!(["hostname", "UNIQUE"])
        );
    }

    #[test]
    fn health_check_serializes_camel_case() {
        let hc = HealthCheck {
            protocol: "COMMAND".to_string(),
            command: CommandSpec {
                value: "true".to_string(),
            },
            grace_period_seconds: 0,
            interval_seconds: 15,
            timeout_seconds: 10,
            max_consecutive_failures: 6,
            ignore_http1xx: false,
        };
        assert_eq!(
            serde_json::to_value(&hc).unwrap(),
            json!({
                "protocol": "COMMAND",
                "command": { "value": "true" },
                "gracePeriodSeconds": 0,
                "intervalSeconds": 15,
                "timeoutSeconds": 10,
                "maxConsecutiveFailures": 6,
                "ignoreHttp1xx": false,
            })
        );
    }

    #[test]
    fn container_type_field_renamed() {
        let container = Container {
            container_type: "DOCKER".to_string(),
            docker: DockerSpec {
                image: "registry/app:abc".to_string(),
                network: "BRIDGE".to_string(),
                port_mappings: vec![PortMapping {
                    container_port: 9000,
                    labels: BTreeMap::new(),
                }],
                parameters: vec![],
            },
        };
        let value = serde_json::to_value(&container).unwrap();
        assert_eq!(value["type"], "DOCKER");
        assert_eq!(value["docker"]["portMappings"][0]["containerPort"], 9000);
    }

    #[test]
    fn null_cmd_is_kept_on_the_wire() {
        let spec = AppSpec {
            id: "/a".to_string(),
            cmd: None,
            instances: 1,
            cpus: 0.1,
            mem: 32.0,
            container: Container {
                container_type: "DOCKER".to_string(),
                docker: DockerSpec {
                    image: "r/a:t".to_string(),
                    network: "BRIDGE".to_string(),
                    port_mappings: vec![],
                    parameters: vec![],
                },
            },
            constraints: vec![],
            labels: BTreeMap::new(),
            health_checks: vec![],
            upgrade_strategy: UpgradeStrategy {
                maximum_over_capacity: 1,
            },
        };
        let value = serde_json::to_value(&spec).unwrap();
        assert!(value.as_object().unwrap().contains_key("cmd"));
        assert_eq!(value["cmd"], serde_json::Value::Null);
        assert_eq!(value["upgradeStrategy"]["maximumOverCapacity"], 1);
    }
}
