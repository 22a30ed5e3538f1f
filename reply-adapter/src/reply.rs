//! Raw reply shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display text for an empty or unusable reply.
pub const NO_RESPONSE: &str = "No response.";

/// The shapes an assistant reply arrives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawReply {
    /// Plain text
    Text { text: String },
    /// A wrapper object carrying the text
    Structured { content: String },
    /// Lines or fragments to join
    List { items: Vec<String> },
}

impl RawReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Classify a JSON value of unknown shape.
    ///
    /// Objects are read from `content`, then `text`; anything else is
    /// rendered as JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::text(""),
            Value::String(s) => Self::text(s.clone()),
            Value::Array(items) => Self::List {
                items: items.iter().map(value_text).collect(),
            },
            Value::Object(map) => {
                let content = map
                    .get("content")
                    .or_else(|| map.get("text"))
                    .map(value_text)
                    .unwrap_or_else(|| value.to_string());
                Self::Structured { content }
            }
            other => Self::text(other.to_string()),
        }
    }

    /// Single trimmed display string, [`NO_RESPONSE`] when empty.
    pub fn normalize(&self) -> String {
        let joined = match self {
            Self::Text { text } => text.clone(),
            Self::Structured { content } => content.clone(),
            Self::List { items } => items.join("\n"),
        };
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            NO_RESPONSE.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
