//! Analysis controller: owns the page state and drives one analysis at a time

use crate::backend::{normalize_error, AnalysisBackend};
use crate::render::{render, Rendered};
use crate::request::{normalize_backend_url, select_request, AnalysisInputs, InputError};
use crate::result::AnalysisResult;
use crate::status::{Status, ANALYZING, COMPLETE, READY};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const NO_ANALYSIS: &str = "No analysis yet.";
pub const NO_DETAILS: &str = "Upload logs to see details.";

/// Everything the user sees or edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub status: Status,
    pub summary: String,
    pub detail: String,
    /// Whether the analyze trigger accepts input
    pub analyze_enabled: bool,
    pub inputs: AnalysisInputs,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: Status::ready(),
            summary: NO_ANALYSIS.to_string(),
            detail: NO_DETAILS.to_string(),
            analyze_enabled: true,
            inputs: AnalysisInputs::default(),
        }
    }
}

/// How an `analyze` call ended
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeOutcome {
    /// Validation failed, nothing was sent
    Rejected(InputError),
    /// The request was sent and failed
    Failed(String),
    /// The result was rendered
    Completed(AnalysisResult),
}

impl AnalyzeOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, AnalyzeOutcome::Completed(_))
    }
}

/// Controller over a backend
pub struct AnalysisController {
    backend: Arc<dyn AnalysisBackend>,
    state: UiState,
}

impl AnalysisController {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        Self {
            backend,
            state: UiState::default(),
        }
    }

    /// Start with the given inputs already filled in
    pub fn with_inputs(mut self, inputs: AnalysisInputs) -> Self {
        self.state.inputs = inputs;
        self
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn inputs_mut(&mut self) -> &mut AnalysisInputs {
        &mut self.state.inputs
    }

    pub fn set_status(&mut self, message: impl Into<String>, is_error: bool) {
        self.state.status = Status::new(message, is_error);
    }

    /// Reset inputs, outputs and status. No network.
    pub fn clear(&mut self) {
        self.state.inputs.text.clear();
        self.state.inputs.file = None;
        self.state.summary = NO_ANALYSIS.to_string();
        self.state.detail = NO_DETAILS.to_string();
        self.set_status(READY, false);
    }

    /// Validate the current inputs, send exactly one request and show the outcome.
    ///
    /// On failure only the status changes; earlier output stays on screen.
    pub async fn analyze(&mut self) -> AnalyzeOutcome {
        let prepared = normalize_backend_url(&self.state.inputs.backend_url)
            .and_then(|url| select_request(&self.state.inputs).map(|request| (url, request)));

        let (url, request) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                debug!(error = %err, "Analysis inputs rejected");
                self.set_status(err.to_string(), true);
                return AnalyzeOutcome::Rejected(err);
            }
        };

        self.set_status(ANALYZING, false);
        self.state.analyze_enabled = false;

        let result = self.backend.analyze(&url, &request).await;

        self.state.analyze_enabled = true;

        match result {
            Ok(result) => {
                let Rendered { summary, detail } = render(&result);
                self.state.summary = summary;
                self.state.detail = detail;
                self.set_status(COMPLETE, false);
                info!(id = %result.id, mode = %result.mode, "Analysis complete");
                AnalyzeOutcome::Completed(result)
            }
            Err(err) => {
                let message = normalize_error(&err);
                warn!(backend = self.backend.name(), error = %err, "Analysis failed");
                self.set_status(format!("Error: {}", message), true);
                AnalyzeOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, HealthStatus};
    use crate::request::{AnalysisRequest, FileInput};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every call and answers with a canned reply
    struct MockBackend {
        calls: Mutex<Vec<(String, AnalysisRequest)>>,
        reply: Mutex<Reply>,
    }

    type Reply = fn() -> Result<AnalysisResult, BackendError>;

    impl MockBackend {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                reply: Mutex::new(reply),
            })
        }

        fn set_reply(&self, reply: Reply) {
            *self.reply.lock().unwrap() = reply;
        }

        fn calls(&self) -> Vec<(String, AnalysisRequest)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AnalysisBackend for MockBackend {
        fn name(&self) -> &str {
            "mock"
        }

        async fn analyze(
            &self,
            base_url: &str,
            request: &AnalysisRequest,
        ) -> Result<AnalysisResult, BackendError> {
            self.calls
                .lock()
                .unwrap()
                .push((base_url.to_string(), request.clone()));
            let reply = *self.reply.lock().unwrap();
            reply()
        }

        async fn health_check(&self, _base_url: &str) -> HealthStatus {
            HealthStatus {
                healthy: true,
                latency_ms: Some(0),
                error: None,
            }
        }
    }

    fn all_clear() -> Result<AnalysisResult, BackendError> {
        Ok(serde_json::from_value(json!({
            "id": "abc",
            "mode": "strict",
            "report": "All clear",
            "detected_types": ["ERROR"],
            "stats": {"errors": 1},
            "chunk_count": 1,
            "chunk_summaries": [{"chunk": 1}]
        }))
        .unwrap())
    }

    fn no_report() -> Result<AnalysisResult, BackendError> {
        Ok(serde_json::from_value(json!({"id": "abc", "mode": "quick"})).unwrap())
    }

    fn bad_log_type() -> Result<AnalysisResult, BackendError> {
        Err(BackendError::Http {
            status: 422,
            body: "bad log_type".to_string(),
        })
    }

    fn empty_failure() -> Result<AnalysisResult, BackendError> {
        Err(BackendError::Http {
            status: 500,
            body: String::new(),
        })
    }

    fn malformed_body() -> Result<AnalysisResult, BackendError> {
        let err = serde_json::from_str::<AnalysisResult>("<html>gateway timeout</html>").unwrap_err();
        Err(BackendError::Decode(err))
    }

    fn inputs(text: &str) -> AnalysisInputs {
        AnalysisInputs {
            backend_url: "http://localhost:8000/".to_string(),
            mode: "strict".to_string(),
            log_type: String::new(),
            file: None,
            text: text.to_string(),
        }
    }

    fn controller(backend: &Arc<MockBackend>, inputs: AnalysisInputs) -> AnalysisController {
        AnalysisController::new(backend.clone()).with_inputs(inputs)
    }

    #[test]
    fn test_initial_state() {
        let controller = AnalysisController::new(MockBackend::new(all_clear));
        let state = controller.state();
        assert_eq!(state.status, Status::new("Ready.", false));
        assert_eq!(state.summary, "No analysis yet.");
        assert_eq!(state.detail, "Upload logs to see details.");
        assert!(state.analyze_enabled);
    }

    #[tokio::test]
    async fn test_missing_backend_url() {
        let backend = MockBackend::new(all_clear);
        let mut controller = controller(&backend, AnalysisInputs {
            backend_url: String::new(),
            ..inputs("ERROR x")
        });

        let outcome = controller.analyze().await;

        assert_eq!(outcome, AnalyzeOutcome::Rejected(InputError::MissingBackendUrl));
        assert!(backend.calls().is_empty());
        assert_eq!(controller.state().status, Status::new("Enter a backend URL.", true));
        assert!(controller.state().analyze_enabled);
    }

    #[tokio::test]
    async fn test_url_checked_before_input() {
        let backend = MockBackend::new(all_clear);
        let mut controller = controller(&backend, AnalysisInputs {
            backend_url: "/".to_string(),
            ..inputs("")
        });

        controller.analyze().await;
        assert_eq!(controller.state().status.message, "Enter a backend URL.");
    }

    #[tokio::test]
    async fn test_missing_input() {
        let backend = MockBackend::new(all_clear);
        let mut controller = controller(&backend, inputs("   \n "));

        let outcome = controller.analyze().await;

        assert_eq!(outcome, AnalyzeOutcome::Rejected(InputError::MissingInput));
        assert!(backend.calls().is_empty());
        assert_eq!(
            controller.state().status,
            Status::new("Provide a file or paste logs.", true)
        );
        assert!(controller.state().analyze_enabled);
    }

    #[tokio::test]
    async fn test_file_wins_over_text() {
        let backend = MockBackend::new(all_clear);
        let mut controller = controller(&backend, AnalysisInputs {
            file: Some(FileInput::new("app.log", b"ERROR boom".to_vec())),
            ..inputs("pasted text")
        });

        controller.analyze().await;

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        let (url, request) = &calls[0];
        assert_eq!(url, "http://localhost:8000");
        assert_eq!(request.endpoint(), "/analyze-file");
        let AnalysisRequest::File(file) = request else {
            panic!("expected file request, got {:?}", request);
        };
        assert_eq!(file.file.bytes, b"ERROR boom");
    }

    #[tokio::test]
    async fn test_text_only_sends_null_log_type() {
        let backend = MockBackend::new(all_clear);
        let mut controller = controller(&backend, inputs("ERROR disk full"));

        controller.analyze().await;

        let calls = backend.calls();
        let AnalysisRequest::Text(text) = &calls[0].1 else {
            panic!("expected text request");
        };
        assert_eq!(
            serde_json::to_value(text).unwrap()["log_type"],
            serde_json::Value::Null
        );
    }

    #[tokio::test]
    async fn test_success_renders_result() {
        let backend = MockBackend::new(all_clear);
        let mut controller = controller(&backend, inputs("ERROR disk full"));

        let outcome = controller.analyze().await;

        assert!(outcome.is_completed());
        let state = controller.state();
        assert_eq!(state.summary, "All clear");
        assert!(state.detail.starts_with("{\n  \"id\": \"abc\",\n  \"mode\": \"strict\","));
        assert_eq!(state.status, Status::new("Analysis complete.", false));
        assert!(state.analyze_enabled);
    }

    #[tokio::test]
    async fn test_success_without_report() {
        let backend = MockBackend::new(no_report);
        let mut controller = controller(&backend, inputs("INFO ok"));

        controller.analyze().await;
        assert_eq!(controller.state().summary, "No report generated.");
    }

    #[tokio::test]
    async fn test_http_failure_keeps_previous_output() {
        let backend = MockBackend::new(all_clear);
        let mut controller = controller(&backend, inputs("ERROR disk full"));
        controller.analyze().await;
        let before = controller.state().clone();

        backend.set_reply(bad_log_type);
        let outcome = controller.analyze().await;

        assert_eq!(outcome, AnalyzeOutcome::Failed("bad log_type".to_string()));
        let state = controller.state();
        assert_eq!(state.status, Status::new("Error: bad log_type", true));
        assert_eq!(state.summary, before.summary);
        assert_eq!(state.detail, before.detail);
        assert!(state.analyze_enabled);
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_decode_failure_keeps_previous_output() {
        let backend = MockBackend::new(all_clear);
        let mut controller = controller(&backend, inputs("ERROR disk full"));
        controller.analyze().await;
        let before = controller.state().clone();

        backend.set_reply(malformed_body);
        let outcome = controller.analyze().await;

        assert!(matches!(outcome, AnalyzeOutcome::Failed(_)));
        let state = controller.state();
        assert!(state.status.message.starts_with("Error: "));
        assert!(state.status.is_error);
        assert_eq!(state.summary, before.summary);
        assert_eq!(state.detail, before.detail);
        assert!(state.analyze_enabled);
    }

    #[tokio::test]
    async fn test_http_failure_empty_body() {
        let backend = MockBackend::new(empty_failure);
        let mut controller = controller(&backend, inputs("ERROR disk full"));

        controller.analyze().await;
        assert_eq!(controller.state().status, Status::new("Error: Request failed", true));
        assert_eq!(controller.state().summary, "No analysis yet.");
    }

    #[tokio::test]
    async fn test_clear_resets_everything() {
        let backend = MockBackend::new(all_clear);
        let mut controller = controller(&backend, AnalysisInputs {
            file: Some(FileInput::new("app.log", b"x".to_vec())),
            ..inputs("ERROR disk full")
        });
        controller.analyze().await;

        controller.clear();
        let once = controller.state().clone();
        assert_eq!(once.summary, "No analysis yet.");
        assert_eq!(once.detail, "Upload logs to see details.");
        assert_eq!(once.status, Status::new("Ready.", false));
        assert!(once.inputs.text.is_empty());
        assert!(once.inputs.file.is_none());
        // URL and mode are not part of the reset
        assert_eq!(once.inputs.backend_url, "http://localhost:8000/");

        controller.clear();
        assert_eq!(controller.state(), &once);
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_after_error() {
        let backend = MockBackend::new(bad_log_type);
        let mut controller = controller(&backend, inputs("ERROR"));
        controller.analyze().await;
        assert!(controller.state().status.is_error);

        controller.clear();
        assert_eq!(controller.state().status, Status::new("Ready.", false));
    }
}
