//! loglens - client for a remote log analysis backend
//!
//! This crate provides:
//! - Request selection: pasted text goes out as JSON, a selected file as multipart
//! - An HTTP backend client behind the `AnalysisBackend` trait
//! - A controller owning the status line and the rendered report
//! - An interactive session that drives the controller from a terminal

pub mod backend;
pub mod config;
pub mod controller;
pub mod render;
pub mod request;
pub mod result;
pub mod session;
pub mod status;

pub use backend::{AnalysisBackend, BackendError, HttpBackend};
pub use config::ClientConfig;
pub use controller::{AnalysisController, AnalyzeOutcome, UiState};
pub use request::{AnalysisInputs, AnalysisRequest, FileInput};
pub use result::AnalysisResult;
pub use status::Status;
