//! Scripted transport for unit tests

use crate::error::FetchError;
use crate::transport::Transport;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

type Reply = Result<Value, FetchError>;

#[derive(Default)]
struct Script {
    /// One-shot replies, consumed in order before the standing reply
    queued: HashMap<String, VecDeque<Reply>>,
    standing: HashMap<String, Reply>,
    calls: HashMap<String, usize>,
}

/// Transport answering from per-URL scripts and counting calls
#[derive(Default)]
pub(crate) struct StubTransport {
    script: Mutex<Script>,
    delay: Mutex<Option<Duration>>,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue a one-shot reply for `url`
    pub(crate) fn push(&self, url: &str, reply: Reply) {
        let mut script = self.script.lock().unwrap();
        script
            .queued
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Reply returned for `url` whenever nothing is queued
    pub(crate) fn set(&self, url: &str, reply: Reply) {
        let mut script = self.script.lock().unwrap();
        script.standing.insert(url.to_string(), reply);
    }

    pub(crate) fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub(crate) fn calls(&self, url: &str) -> usize {
        let script = self.script.lock().unwrap();
        script.calls.get(url).copied().unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> usize {
        let script = self.script.lock().unwrap();
        script.calls.values().sum()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get_json(&self, url: &str, _timeout: Duration) -> Result<Value, FetchError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut script = self.script.lock().unwrap();
        *script.calls.entry(url.to_string()).or_default() += 1;

        if let Some(reply) = script.queued.get_mut(url).and_then(VecDeque::pop_front) {
            return reply;
        }
        script
            .standing
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Network(format!("no stub for {url}"))))
    }
}
