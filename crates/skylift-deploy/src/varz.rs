//! Canary health validation via the service's varz endpoint.
//!
//! A freshly placed canary exposes `/varz`, a JSON map of counters.
//! Validation probes the canary's candidate ports in order, takes the
//! first one that answers, and fails the canary if any known
//! error-counter shows a non-zero one-minute rate.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{DeployError, DeployResult};

/// Path of the health-metrics endpoint.
pub const VARZ_PATH: &str = "/varz";

/// Counter namespaces that indicate service-level errors.
const ERROR_COUNTER_PREFIXES: [&str; 2] = ["tservice__", "pylons__"];
const ERROR_COUNTER_SUFFIX: &str = "errors";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Health gate run against a placed canary.
#[async_trait]
pub trait CanaryProbe: Send + Sync {
    /// Try `ports` in order on `host`; return the first port whose
    /// varz endpoint answered with clean error counters.
    async fn check(&self, host: &str, ports: &[u16]) -> DeployResult<u16>;
}

/// Fetch seam for the varz endpoint, so validation is testable without
/// a network.
#[async_trait]
pub trait VarzFetch: Send + Sync {
    async fn fetch(&self, host: &str, port: u16) -> anyhow::Result<Map<String, Value>>;
}

/// Production fetcher: `GET http://{host}:{port}/varz`.
#[derive(Debug, Clone)]
pub struct HttpVarzFetcher {
    http: reqwest::Client,
}

impl HttpVarzFetcher {
    pub fn new() -> DeployResult<Self> {
        Ok(Self {
            http: reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?,
        })
    }
}

#[async_trait]
impl VarzFetch for HttpVarzFetcher {
    async fn fetch(&self, host: &str, port: u16) -> anyhow::Result<Map<String, Value>> {
        let url = format!("http://{host}:{port}{VARZ_PATH}");
        let response = self.http.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

/// Validates a canary by scanning its varz counters.
#[derive(Debug, Clone)]
pub struct VarzValidator<F> {
    fetcher: F,
}

impl VarzValidator<HttpVarzFetcher> {
    /// Validator backed by a real HTTP fetcher.
    pub fn over_http() -> DeployResult<Self> {
        Ok(Self::new(HttpVarzFetcher::new()?))
    }
}

impl<F> VarzValidator<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl<F: VarzFetch> CanaryProbe for VarzValidator<F> {
    async fn check(&self, host: &str, ports: &[u16]) -> DeployResult<u16> {
        let mut failures = Vec::new();
        for &port in ports {
            let varz = match self.fetcher.fetch(host, port).await {
                Ok(varz) => varz,
                Err(error) => {
                    debug!(host, port, %error, "varz fetch failed, trying next port");
                    failures.push(format!("{host}:{port}: {error}"));
                    continue;
                }
            };
            let offending = error_counters(&varz);
            if !offending.is_empty() {
                return Err(DeployError::VarzErrors {
                    counters: offending,
                });
            }
            return Ok(port);
        }
        Err(DeployError::VarzNetworkErrors { failures })
    }
}

/// Top-level keys in a known error-counter namespace, ending in
/// `errors`, whose one-minute rate is non-zero. A counter without a
/// `count_1m` field counts as zero.
pub fn error_counters(varz: &Map<String, Value>) -> Vec<String> {
    varz.iter()
        .filter(|(key, _)| {
            ERROR_COUNTER_PREFIXES.iter().any(|p| key.starts_with(p))
                && key.ends_with(ERROR_COUNTER_SUFFIX)
        })
        .filter(|(_, value)| value.get("count_1m").and_then(Value::as_i64).unwrap_or(0) > 0)
        .map(|(key, _)| key.clone())
        .collect()
}
