//! Analysis result returned by the backend

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A key that is present maps to `Some`, even when its value is `null`
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Response body of a successful analysis.
///
/// Only `id` and `mode` are required. Everything else is kept as the
/// backend sent it; a missing key is `None`, an explicit `null` is
/// `Some(Value::Null)`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AnalysisResult {
    pub id: String,
    pub mode: String,
    #[serde(default)]
    pub report: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub detected_types: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub stats: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub chunk_count: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub chunk_summaries: Option<Value>,
}

impl AnalysisResult {
    /// Names of detected log types.
    ///
    /// Entries may be plain strings or objects with a `name` field.
    pub fn detected_type_names(&self) -> Vec<String> {
        let Some(Value::Array(entries)) = &self.detected_types else {
            return Vec::new();
        };
        entries
            .iter()
            .filter_map(|entry| match entry {
                Value::String(name) => Some(name.clone()),
                Value::Object(fields) => fields
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .collect()
    }
}
