use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A recovered chat turn.
///
/// Identity for deduplication is the (timestamp, prompt) pair; two turns
/// with an equal pair are the same turn regardless of any other field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(rename = "date")]
    pub timestamp: NaiveDateTime,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Opaque identifiers found at fixed record slots, kept for traceability.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub trace_ids: Vec<String>,
    /// Index of the originating transaction in the input log.
    pub source_entry: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_hint: Option<String>,
}

impl ChatTurn {
    /// Deduplication identity.
    pub fn identity(&self) -> (NaiveDateTime, &str) {
        (self.timestamp, self.prompt.as_str())
    }
}
