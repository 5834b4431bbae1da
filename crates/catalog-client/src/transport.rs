//! HTTP transport used by the retrying fetcher

use crate::error::FetchError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "catalog-client-rs/0.1";

/// A single JSON GET against the remote source
///
/// Implementations must give up once `timeout` has elapsed and report it as
/// [`FetchError::Timeout`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &str, timeout: Duration) -> Result<Value, FetchError>;
}

/// [`Transport`] backed by a shared `reqwest` client
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str, timeout: Duration) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response.bytes().await?;
        debug!(url, size = body.len(), "Fetched response body");

        Ok(serde_json::from_slice(&body)?)
    }
}
