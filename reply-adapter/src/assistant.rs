//! Assistant backend contract.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::reply::RawReply;
use crate::table::ResultTable;

/// Error types for assistant calls.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// Backend is not available
    #[error("Assistant unavailable: {0}")]
    Unavailable(String),

    /// Request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),
}

/// A reply as returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub text: RawReply,
    /// Query the backend ran, if any
    pub sql: Option<String>,
    pub dataframe: Option<ResultTable>,
    /// Which backend answered
    pub source: String,
    pub conversation_id: String,
    /// Backend reported a failure
    pub error: bool,
}

impl AssistantReply {
    /// Parse the backend's JSON reply object.
    pub fn from_json(value: &Value) -> Self {
        let str_field = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            text: RawReply::from_json(value.get("text").unwrap_or(&Value::Null)),
            sql: str_field("sql"),
            dataframe: value.get("dataframe").and_then(ResultTable::from_json),
            source: str_field("source").unwrap_or_else(|| "unknown".to_string()),
            conversation_id: str_field("conversation_id").unwrap_or_default(),
            error: value.get("error").and_then(Value::as_bool).unwrap_or(false),
        }
    }

    /// Rows in the attached table.
    pub fn row_count(&self) -> usize {
        self.dataframe.as_ref().map(ResultTable::row_count).unwrap_or(0)
    }
}

/// A conversational backend that answers free-text data questions.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Backend identifier.
    fn id(&self) -> &str;

    /// Ask a question, continuing `conversation_id` when given.
    async fn ask(
        &self,
        question: &str,
        conversation_id: Option<&str>,
    ) -> Result<AssistantReply, AssistantError>;
}

/// Mock assistant for local mode and testing.
pub struct MockAssistant {
    source: String,
    available: AtomicBool,
    response: Value,
    call_count: AtomicU32,
}

impl MockAssistant {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            available: AtomicBool::new(true),
            response: serde_json::json!({ "text": "Mock response" }),
            call_count: AtomicU32::new(0),
        }
    }

    /// Set the reply body (`text`, `sql`, `dataframe`, `error` fields).
    pub fn with_response(mut self, response: Value) -> Self {
        self.response = response;
        self
    }

    /// Set availability.
    pub fn with_available(self, available: bool) -> Self {
        self.available.store(available, Ordering::SeqCst);
        self
    }

    /// Number of `ask` calls.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Default for MockAssistant {
    fn default() -> Self {
        Self::new("mock")
    }
}

#[async_trait]
impl AssistantBackend for MockAssistant {
    fn id(&self) -> &str {
        &self.source
    }

    async fn ask(
        &self,
        _question: &str,
        conversation_id: Option<&str>,
    ) -> Result<AssistantReply, AssistantError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if !self.available.load(Ordering::SeqCst) {
            return Err(AssistantError::Unavailable("Mock assistant disabled".to_string()));
        }

        let mut reply = AssistantReply::from_json(&self.response);
        reply.source = self.source.clone();
        reply.conversation_id = conversation_id
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        Ok(reply)
    }
}
