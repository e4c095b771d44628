//! Analysis inputs and request variant selection

use serde::Serialize;
use thiserror::Error;

/// Modes understood by the reference backend. Any other string is still sent.
pub const KNOWN_MODES: [&str; 3] = ["quick", "standard", "deep"];

/// Input validation failures. The display text is shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Enter a backend URL.")]
    MissingBackendUrl,

    #[error("Provide a file or paste logs.")]
    MissingInput,
}

/// A selected log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileInput {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// The values of the input controls at the moment analysis is triggered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisInputs {
    pub backend_url: String,
    pub mode: String,
    pub log_type: String,
    pub file: Option<FileInput>,
    pub text: String,
}

/// JSON body for `POST /analyze`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TextRequest {
    pub text: String,
    /// Serialized as `null` when absent
    pub log_type: Option<String>,
    pub mode: String,
}

/// Multipart body for `POST /analyze-file`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRequest {
    pub file: FileInput,
    /// The `log_type` part is only sent when present
    pub log_type: Option<String>,
    pub mode: String,
}

/// Exactly one request shape per analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    Text(TextRequest),
    File(FileRequest),
}

impl AnalysisRequest {
    /// Backend path this request is posted to
    pub fn endpoint(&self) -> &'static str {
        match self {
            AnalysisRequest::Text(_) => "/analyze",
            AnalysisRequest::File(_) => "/analyze-file",
        }
    }

    pub fn mode(&self) -> &str {
        match self {
            AnalysisRequest::Text(req) => &req.mode,
            AnalysisRequest::File(req) => &req.mode,
        }
    }

    /// Size of the log payload in bytes
    pub fn payload_len(&self) -> usize {
        match self {
            AnalysisRequest::Text(req) => req.text.len(),
            AnalysisRequest::File(req) => req.file.bytes.len(),
        }
    }
}

/// Strip one trailing slash; an empty result is a validation error.
pub fn normalize_backend_url(raw: &str) -> Result<String, InputError> {
    let url = raw.strip_suffix('/').unwrap_or(raw);
    if url.is_empty() {
        return Err(InputError::MissingBackendUrl);
    }
    Ok(url.to_string())
}

/// Choose the request variant. A file always wins; pasted text is then ignored.
pub fn select_request(inputs: &AnalysisInputs) -> Result<AnalysisRequest, InputError> {
    let log_type = match inputs.log_type.trim() {
        "" => None,
        value => Some(value.to_string()),
    };

    if let Some(file) = &inputs.file {
        return Ok(AnalysisRequest::File(FileRequest {
            file: file.clone(),
            log_type,
            mode: inputs.mode.clone(),
        }));
    }

    let text = inputs.text.trim();
    if text.is_empty() {
        return Err(InputError::MissingInput);
    }

    Ok(AnalysisRequest::Text(TextRequest {
        text: text.to_string(),
        log_type,
        mode: inputs.mode.clone(),
    }))
}
