//! HTTP analysis backend

use super::{AnalysisBackend, BackendError, HealthStatus};
use crate::request::{AnalysisRequest, FileRequest};
use crate::result::AnalysisResult;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Backend reached over HTTP
pub struct HttpBackend {
    client: Client,
    name: String,
}

impl HttpBackend {
    /// Create a backend client with a whole-request timeout
    pub fn new(timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            name: "http".to_string(),
        })
    }
}

/// Multipart body: `file`, then `log_type` if present, then `mode`
fn file_form(request: &FileRequest) -> Form {
    let part = Part::bytes(request.file.bytes.clone()).file_name(request.file.file_name.clone());
    let mut form = Form::new().part("file", part);
    if let Some(log_type) = &request.log_type {
        form = form.text("log_type", log_type.clone());
    }
    form.text("mode", request.mode.clone())
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn analyze(
        &self,
        base_url: &str,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, BackendError> {
        let url = format!("{}{}", base_url, request.endpoint());

        info!(
            backend = %self.name,
            url = %url,
            mode = request.mode(),
            payload_bytes = request.payload_len(),
            "Sending analysis request"
        );

        let builder = match request {
            AnalysisRequest::Text(body) => self.client.post(&url).json(body),
            AnalysisRequest::File(file) => self.client.post(&url).multipart(file_form(file)),
        };

        let start = Instant::now();
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(
            status = status.as_u16(),
            body_len = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Got backend response"
        );

        if !status.is_success() {
            warn!(status = status.as_u16(), "Backend rejected analysis request");
            return Err(BackendError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn health_check(&self, base_url: &str) -> HealthStatus {
        let url = format!("{}/health", base_url);
        let start = Instant::now();

        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => HealthStatus {
                healthy: true,
                latency_ms: Some(start.elapsed().as_millis() as u64),
                error: None,
            },
            Ok(response) => HealthStatus {
                healthy: false,
                latency_ms: Some(start.elapsed().as_millis() as u64),
                error: Some(format!("HTTP {}", response.status())),
            },
            Err(e) => HealthStatus {
                healthy: false,
                latency_ms: None,
                error: Some(e.to_string()),
            },
        }
    }
}
