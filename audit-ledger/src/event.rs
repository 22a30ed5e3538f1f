//! The audit event wire contract.

use access_gate::RequestContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `source_tables` value recorded for chat turns.
pub const AI_GENERATED_SOURCE: &str = "(AI-generated query)";

/// Kind of audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionType {
    /// View load
    Query,
    /// Chat turn
    Chat,
    /// Like or dislike on an assistant reply
    Feedback,
}

/// Audit event. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub user_email: String,
    pub user_role: String,
    pub action_type: ActionType,
    /// Which assistant backend answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_tables: Option<String>,
    /// View description, SQL or question; the conversation id for feedback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liked: Option<bool>,
}

impl AuditEvent {
    fn base(ctx: &RequestContext, action_type: ActionType) -> Self {
        Self {
            timestamp: Utc::now(),
            user_email: ctx.email().to_string(),
            user_role: ctx.role().to_string(),
            action_type,
            ai_source: None,
            source_tables: None,
            query_text: None,
            row_count: None,
            message_index: None,
            liked: None,
        }
    }

    /// A view load touching `source_tables`.
    pub fn query(
        ctx: &RequestContext,
        source_tables: &[&str],
        description: &str,
        row_count: u64,
    ) -> Self {
        Self {
            source_tables: Some(source_tables.join(", ")),
            query_text: Some(description.to_string()),
            row_count: Some(row_count),
            ..Self::base(ctx, ActionType::Query)
        }
    }

    /// A chat turn.
    pub fn chat(
        ctx: &RequestContext,
        ai_source: &str,
        query_text: &str,
        row_count: u64,
    ) -> Self {
        Self {
            ai_source: Some(ai_source.to_string()),
            source_tables: Some(AI_GENERATED_SOURCE.to_string()),
            query_text: Some(query_text.to_string()),
            row_count: Some(row_count),
            ..Self::base(ctx, ActionType::Chat)
        }
    }

    /// Feedback on the assistant message at `message_index`.
    pub fn feedback(
        ctx: &RequestContext,
        conversation_id: Option<&str>,
        message_index: usize,
        liked: bool,
    ) -> Self {
        Self {
            query_text: Some(conversation_id.unwrap_or_default().to_string()),
            message_index: Some(message_index),
            liked: Some(liked),
            ..Self::base(ctx, ActionType::Feedback)
        }
    }

    /// Convert to a JSONL line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use access_gate::Identity;

    #[test]
    fn test_query_event_fields() {
        let ctx = RequestContext::identified(Identity::new("ops@example.com", "engineer"));
        let event = AuditEvent::query(&ctx, &["engine_rul", "engine_sensor"], "Engine Health load", 42);
        assert_eq!(event.action_type, ActionType::Query);
        assert_eq!(event.source_tables.as_deref(), Some("engine_rul, engine_sensor"));
        assert_eq!(event.query_text.as_deref(), Some("Engine Health load"));
        assert_eq!(event.row_count, Some(42));
        assert_eq!(event.user_role, "engineer");
    }

    #[test]
    fn test_jsonl_shape() {
        let event = AuditEvent::chat(&RequestContext::anonymous(), "genie", "SELECT 1", 1);
        let line = event.to_jsonl().unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["action_type"], "CHAT");
        assert_eq!(value["user_email"], "unknown");
        assert_eq!(value["user_role"], "no_access");
        assert_eq!(value["source_tables"], AI_GENERATED_SOURCE);
        assert!(value.get("liked").is_none());
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_feedback_records_conversation() {
        let event = AuditEvent::feedback(&RequestContext::anonymous(), Some("conv-1"), 3, false);
        assert_eq!(event.query_text.as_deref(), Some("conv-1"));
        assert_eq!(event.message_index, Some(3));
        assert_eq!(event.liked, Some(false));

        let event = AuditEvent::feedback(&RequestContext::anonymous(), None, 1, true);
        assert_eq!(event.query_text.as_deref(), Some(""));
    }
}
