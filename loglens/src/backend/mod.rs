//! Analysis backend abstraction and the HTTP implementation

mod http;

pub use http::HttpBackend;

use crate::request::AnalysisRequest;
use crate::result::AnalysisResult;
use async_trait::async_trait;
use thiserror::Error;

/// Message used when a failed response has an empty body
pub const REQUEST_FAILED: &str = "Request failed";

/// Errors that can occur when talking to the analysis backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Turn any backend failure into the message shown after `Error: `.
///
/// Transport, HTTP and decode failures are deliberately not told apart
/// beyond their message.
pub fn normalize_error(err: &BackendError) -> String {
    match err {
        BackendError::Http { body, .. } if body.is_empty() => REQUEST_FAILED.to_string(),
        BackendError::Http { body, .. } => body.clone(),
        other => other.to_string(),
    }
}

/// Health status of a backend
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
}

/// Trait for analysis backends
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Name for logging
    fn name(&self) -> &str;

    /// Send one analysis request to the backend at `base_url`
    async fn analyze(
        &self,
        base_url: &str,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, BackendError>;

    /// Check if the backend at `base_url` is up
    async fn health_check(&self, base_url: &str) -> HealthStatus;
}
