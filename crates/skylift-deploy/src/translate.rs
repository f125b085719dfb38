//! Pool config → app spec translation.
//!
//! `pool_to_spec` is a pure function: identical inputs always produce
//! an identical spec, which is what makes dry-run previews, diffing,
//! and idempotent re-application work.

use std::collections::BTreeMap;

use skylift_config::{DeploySettings, Environment, PoolConfig, ServiceConfig};
use skylift_marathon::{
    AppSpec, CommandSpec, Constraint, Container, DockerParameter, DockerSpec, HealthCheck,
    PortMapping, UpgradeStrategy,
};

/// Suffix appended to an app id for its ephemeral canary twin.
pub const CANARY_SUFFIX: &str = "-canary";

/// Translate one resolved pool into the spec submitted to the
/// scheduler.
///
/// Staging is deliberately unconstrained and ungrouped; everywhere
/// else the pool is pinned to its instance group and labeled for its
/// HAProxy group.
pub fn pool_to_spec(
    tag: &str,
    service_id: &str,
    pool: &PoolConfig,
    environment: Environment,
    service: &ServiceConfig,
    settings: &DeploySettings,
) -> AppSpec {
    let hostname = pool
        .hostname
        .clone()
        .unwrap_or_else(|| default_hostname(service_id).to_string());

    let mut constraints = Vec::new();
    let mut labels = BTreeMap::new();
    if environment != Environment::Stage {
        constraints.push(Constraint::cluster("Group", pool.instance_group.as_str()));
        labels.insert(
            "HAPROXY_GROUP".to_string(),
            pool.haproxy_group.as_str().to_string(),
        );
    }
    if pool.one_per_host {
        constraints.push(Constraint::unique("hostname"));
    }

    let health = &pool.health_check;
    let health_checks = vec![HealthCheck {
        protocol: "COMMAND".to_string(),
        command: CommandSpec {
            value: health.command.clone(),
        },
        grace_period_seconds: health.grace_period_seconds,
        interval_seconds: health.interval_seconds,
        timeout_seconds: health.timeout_seconds,
        max_consecutive_failures: health.max_consecutive_failures,
        ignore_http1xx: false,
    }];

    let vips = pool.vip_labels();
    let port_mappings = service
        .ports
        .iter()
        .map(|&port| PortMapping {
            container_port: port,
            labels: vips
                .iter()
                .map(|(label, host)| (label.clone(), format!("{host}:{port}")))
                .collect(),
        })
        .collect();

    AppSpec {
        id: service_id.to_string(),
        cmd: None,
        instances: pool.instances,
        cpus: settings.cpu_slice * f64::from(pool.instance_size),
        mem: settings.mem_slice * f64::from(pool.instance_size),
        container: Container {
            container_type: "DOCKER".to_string(),
            docker: DockerSpec {
                image: format!(
                    "{}/{}:{tag}",
                    settings.registry.trim_end_matches('/'),
                    service.name
                ),
                network: "BRIDGE".to_string(),
                port_mappings,
                parameters: vec![DockerParameter {
                    key: "hostname".to_string(),
                    value: hostname,
                }],
            },
        },
        constraints,
        labels,
        health_checks,
        upgrade_strategy: UpgradeStrategy {
            maximum_over_capacity: 1,
        },
    }
}

/// Derive the ephemeral canary twin: same spec, id suffixed, a single
/// instance.
pub fn canary_spec(spec: &AppSpec) -> AppSpec {
    let mut canary = spec.clone();
    canary.id.push_str(CANARY_SUFFIX);
    canary.instances = 1;
    canary
}

fn default_hostname(service_id: &str) -> &str {
    service_id.rsplit('/').next().unwrap_or(service_id)
}
