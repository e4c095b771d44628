//! Projection of an analysis result into display text

use crate::result::AnalysisResult;
use serde::Serialize;
use serde_json::Value;

/// Summary shown when the backend sent no report
pub const NO_REPORT: &str = "No report generated.";

/// Rendered display surfaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Human-readable report
    pub summary: String,
    /// Pretty-printed JSON of the detail fields
    pub detail: String,
}

/// Fields shown in the detail view, in display order
#[derive(Serialize)]
struct DetailView<'a> {
    id: &'a str,
    mode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detected_types: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chunk_count: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chunk_summaries: Option<&'a Value>,
}

impl<'a> From<&'a AnalysisResult> for DetailView<'a> {
    fn from(result: &'a AnalysisResult) -> Self {
        Self {
            id: &result.id,
            mode: &result.mode,
            detected_types: result.detected_types.as_ref(),
            stats: result.stats.as_ref(),
            chunk_count: result.chunk_count.as_ref(),
            chunk_summaries: result.chunk_summaries.as_ref(),
        }
    }
}

/// Summary text: the report, or the placeholder when it is missing or empty
pub fn summary_text(result: &AnalysisResult) -> String {
    match result.report.as_deref() {
        Some(report) if !report.is_empty() => report.to_string(),
        _ => NO_REPORT.to_string(),
    }
}

/// Detail text: two-space indented JSON of the detail fields
pub fn detail_text(result: &AnalysisResult) -> String {
    // Serializing borrowed strings and `Value`s cannot fail
    serde_json::to_string_pretty(&DetailView::from(result)).unwrap_or_default()
}

/// Render both display surfaces
pub fn render(result: &AnalysisResult) -> Rendered {
    Rendered {
        summary: summary_text(result),
        detail: detail_text(result),
    }
}
