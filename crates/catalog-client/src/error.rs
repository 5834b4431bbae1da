//! Error types for the catalog client

use std::fmt;

const TIMEOUT_MESSAGE: &str = "Request timed out, please try again later";
const NETWORK_MESSAGE: &str = "Network error, please check your connection";
const LOADING_MESSAGE: &str = "Failed to load products, please try again later";

/// Raw failure of a single fetch, as produced by the transport and the retrying fetcher
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request did not complete before its deadline
    Timeout,
    /// Transport-level failure (unreachable host, connection reset, ...)
    Network(String),
    /// Remote answered with a non-2xx status
    Status { status: u16, reason: String },
    /// Body was not JSON, or not the expected shape
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Status { status, reason } => write!(f, "HTTP {status}: {reason}"),
            Self::Decode(msg) => write!(f, "invalid response body: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Errors surfaced to callers of the catalog service
///
/// Every variant keeps the underlying [`FetchError`] as its source, but the
/// `Display` output is a stable, user-facing message.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    Timeout(FetchError),
    Network(FetchError),
    Loading(FetchError),
}

impl CatalogError {
    /// The failure this error was normalized from
    pub fn cause(&self) -> &FetchError {
        match self {
            Self::Timeout(e) | Self::Network(e) | Self::Loading(e) => e,
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout(_) => f.write_str(TIMEOUT_MESSAGE),
            Self::Network(_) => f.write_str(NETWORK_MESSAGE),
            Self::Loading(_) => f.write_str(LOADING_MESSAGE),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause())
    }
}

impl From<FetchError> for CatalogError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout => Self::Timeout(err),
            FetchError::Network(_) => Self::Network(err),
            FetchError::Status { .. } | FetchError::Decode(_) => Self::Loading(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
