/*!
 * Wire models for caption sessions.
 */

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::language_utils::LanguageId;

/// Error code sent for unparseable inbound messages
pub const INVALID_JSON: &str = "invalid_json";

/// One inbound caption update, after field coercion
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaptionUpdate {
    /// Current best transcription, outer whitespace trimmed
    pub text: String,
    /// Whether the source will not revise this text further
    pub is_final: bool,
    /// Requested targets, when the client sent a list
    pub targets: Option<Vec<String>>,
}

impl CaptionUpdate {
    /// Parse an inbound message.
    ///
    /// Only malformed JSON is an error. Missing or oddly typed fields fall back
    /// to their defaults, and a document that is not an object behaves as an
    /// update with every field absent.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let payload: Value = serde_json::from_str(raw)?;
        Ok(Self::from_value(&payload))
    }

    /// Coerce an already parsed payload
    pub fn from_value(payload: &Value) -> Self {
        let Some(fields) = payload.as_object() else {
            return Self::default();
        };

        let text = fields.get("text").map(coerce_text).unwrap_or_default();
        let is_final = fields.get("is_final").is_some_and(truthy);
        let targets = match fields.get("targets") {
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            _ => None,
        };

        Self {
            text: text.trim().to_string(),
            is_final,
            targets,
        }
    }
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// A finalized chunk waiting for translation
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChunk {
    /// Position of the chunk within its session, starting at 0
    pub sequence: u64,
    /// Finalized source text
    pub source: String,
    /// Resolved, non-empty target set
    pub targets: Vec<LanguageId>,
}

/// Messages sent back to the client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    /// Structured error, the session stays open
    Error { error: String },
    /// Translations for one finalized chunk, keyed by display code
    Result {
        source: String,
        translations: BTreeMap<String, String>,
    },
}

impl OutboundMessage {
    pub fn invalid_json() -> Self {
        Self::Error { error: INVALID_JSON.to_string() }
    }

    /// Serialize to the JSON text sent over the wire
    pub fn to_json(&self) -> String {
        // Only strings and string maps: serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Lifecycle of one caption session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting messages, chunks may be in flight
    Open,
    /// Disconnect observed, releasing resources
    Closing,
    /// Resources released
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Open => "OPEN",
            Self::Closing => "CLOSING",
            Self::Closed => "CLOSED",
        };
        write!(f, "{}", name)
    }
}
