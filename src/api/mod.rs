// REST client for the BillingCloud API: resources, wallets, billing, prices

mod billing;
mod prices;
mod resources;
mod wallets;

pub use resources::{ComputeCreate, ComputeUpdate, DiskCreate, DiskUpdate, FloatingIpCreate};

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::version;

/// HTTP client for one billing API deployment.
#[derive(Clone)]
pub struct BillingApi {
    client: reqwest::Client,
    /// `{base_url}{api_prefix}`, no trailing slash.
    api_root: String,
    /// `{base_url}`, for endpoints outside the prefix (health).
    base_url: String,
}

impl BillingApi {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .user_agent(version::user_agent())
            .build()?;
        Ok(Self::with_client(
            client,
            config.api.base_url.trim_end_matches('/').to_string(),
            config.api_root(),
        ))
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling, tests).
    pub fn with_client(client: reqwest::Client, base_url: String, api_root: String) -> Self {
        Self {
            client,
            api_root,
            base_url,
        }
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// `GET /health` on the API host. Any failure counts as unhealthy.
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(r) => r.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, operation = "health_check", "billing API unreachable");
                false
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    // ---- private helpers ----

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::parse_response(response).await
    }

    async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let response = self.client.get(self.url(path)).query(query).send().await?;
        Self::parse_response(response).await
    }

    async fn send_json<B, T>(&self, method: reqwest::Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn send_without_result<B>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError>
    where
        B: serde::Serialize + ?Sized,
    {
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::ensure_success(response).await.map(|_| ())
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Pass a 2xx response through; turn anything else into [`ApiError`]
    /// carrying the server's detail text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        if status == StatusCode::NOT_FOUND {
            Err(ApiError::NotFound { detail })
        } else {
            Err(ApiError::Rejected {
                status: status.as_u16(),
                detail,
            })
        }
    }
}

/// Extract the operator-facing message from an error body: the `detail`
/// field of a JSON object if present, else the raw body.
pub fn error_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => Some(trimmed.to_string()),
        },
        _ => Some(trimmed.to_string()),
    }
}
