//! The `Scheduler` trait and its HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::app::AppSpec;
use crate::error::{SchedulerError, SchedulerResult};
use crate::state::{AppState, DeploymentHandle, DeploymentInfo};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Scheduler operations the deployer needs.
///
/// Absent applications are `None`, never an error; error values are
/// reserved for genuine failures.
#[async_trait]
pub trait Scheduler: Send + Sync {
    async fn get_app(&self, app_id: &str) -> SchedulerResult<Option<AppState>>;

    async fn update_app(&self, app_id: &str, spec: &AppSpec) -> SchedulerResult<DeploymentHandle>;

    async fn delete_app(&self, app_id: &str) -> SchedulerResult<Option<DeploymentHandle>>;

    async fn list_deployments(&self) -> SchedulerResult<Vec<DeploymentInfo>>;
}

/// HTTP client for a Marathon-style `/v2` API, spread over an ordered
/// host list. Each request walks the hosts in order and fails over on
/// transport errors; the last transport error is returned when every
/// host is unreachable.
#[derive(Debug, Clone)]
pub struct MarathonClient {
    http: reqwest::Client,
    base_urls: Vec<String>,
}

#[derive(Deserialize)]
struct AppEnvelope {
    app: AppState,
}

impl MarathonClient {
    /// Build a client for `hosts` (`host:port` entries, tried in order).
    pub fn new(hosts: &[String]) -> SchedulerResult<Self> {
        if hosts.is_empty() {
            return Err(SchedulerError::NoHosts);
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_urls: hosts
                .iter()
                .map(|h| format!("http://{}", h.trim_end_matches('/')))
                .collect(),
        })
    }

    fn app_path(app_id: &str) -> String {
        if app_id.starts_with('/') {
            format!("/v2/apps{app_id}")
        } else {
            format!("/v2/apps/{app_id}")
        }
    }

    /// Issue one request, walking the host list on transport errors.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> SchedulerResult<reqwest::Response> {
        let mut last_transport = None;
        for base in &self.base_urls {
            let url = format!("{base}{path}");
            let mut request = self.http.request(method.clone(), &url);
            if let Some(body) = body {
                request = request.json(body);
            }
            match request.send().await {
                Ok(response) => return Ok(response),
                Err(error) => {
                    warn!(host = %base, %error, "scheduler host unreachable, trying next");
                    last_transport = Some(error);
                }
            }
        }
        Err(last_transport
            .map(SchedulerError::Http)
            .unwrap_or(SchedulerError::NoHosts))
    }

    /// Turn a non-success response into an API error carrying the
    /// structured error body.
    async fn api_error(response: reqwest::Response) -> SchedulerError {
        let status = response.status().as_u16();
        let details = response.json::<Value>().await.unwrap_or(Value::Null);
        SchedulerError::Api { status, details }
    }
}

#[async_trait]
impl Scheduler for MarathonClient {
    async fn get_app(&self, app_id: &str) -> SchedulerResult<Option<AppState>> {
        let response = self
            .execute(Method::GET, &Self::app_path(app_id), None)
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let envelope: AppEnvelope = response.json().await?;
                Ok(Some(envelope.app))
            }
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn update_app(&self, app_id: &str, spec: &AppSpec) -> SchedulerResult<DeploymentHandle> {
        let body = serde_json::to_value(spec)
            .map_err(|e| SchedulerError::Other(anyhow::anyhow!("serializing app spec: {e}")))?;
        let response = self
            .execute(Method::PUT, &Self::app_path(app_id), Some(&body))
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::api_error(response).await)
        }
    }

    async fn delete_app(&self, app_id: &str) -> SchedulerResult<Option<DeploymentHandle>> {
        let response = self
            .execute(Method::DELETE, &Self::app_path(app_id), None)
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn list_deployments(&self) -> SchedulerResult<Vec<DeploymentInfo>> {
        let response = self.execute(Method::GET, "/v2/deployments", None).await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::api_error(response).await)
        }
    }
}
