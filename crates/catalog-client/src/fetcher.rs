//! Bounded-retry JSON fetches with a per-attempt deadline

use crate::error::FetchError;
use crate::transport::Transport;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Wraps a [`Transport`] with a deadline per attempt and linear backoff
///
/// A URL is attempted at most `retry_count + 1` times. Retry `n` (starting at
/// 1) waits `retry_delay * n` first. The last failure is returned unchanged.
#[derive(Clone)]
pub struct RetryingFetcher {
    transport: Arc<dyn Transport>,
    timeout: Duration,
    retry_count: u32,
    retry_delay: Duration,
}

impl RetryingFetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        timeout: Duration,
        retry_count: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            transport,
            timeout,
            retry_count,
            retry_delay,
        }
    }

    pub async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let mut attempt = 0;

        loop {
            match self.attempt(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.retry_count => {
                    attempt += 1;
                    warn!(
                        url,
                        attempt,
                        max = self.retry_count,
                        error = %e,
                        "Retrying request"
                    );
                    tokio::time::sleep(self.retry_delay * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn attempt(&self, url: &str) -> Result<Value, FetchError> {
        match tokio::time::timeout(self.timeout, self.transport.get_json(url, self.timeout)).await
        {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout),
        }
    }
}
