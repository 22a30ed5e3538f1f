//! One chat turn: question in, formatted and audited answer out.

use std::sync::Arc;

use access_gate::RequestContext;
use audit_ledger::{AuditRecorder, ChatMessage};
use serde_json::Value;
use tracing::{debug, warn};

use crate::adapter::{DisplayPayload, ReplyFormatter};
use crate::assistant::{AssistantBackend, AssistantReply};
use crate::reply::RawReply;

/// Text shown when the assistant fails.
pub const APOLOGY_TEXT: &str =
    "Sorry, I could not answer that question. Please try rephrasing it.";

/// Longest accepted question, in characters.
pub const MAX_QUESTION_CHARS: usize = 2000;

/// Result of a chat turn. Session values are returned, never stored.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// Transcript including this turn
    pub history: Vec<ChatMessage>,
    /// Conversation to continue next turn
    pub conversation_id: Option<String>,
    /// "Answered by" label, empty when the question was rejected
    pub source_label: String,
    /// Formatted reply, `None` when the question was rejected
    pub payload: Option<DisplayPayload>,
}

/// Chat flow over an assistant backend.
pub struct ChatService<B: AssistantBackend> {
    backend: Arc<B>,
    recorder: AuditRecorder,
    formatter: ReplyFormatter,
}

impl<B: AssistantBackend> ChatService<B> {
    pub fn new(backend: Arc<B>, recorder: AuditRecorder) -> Self {
        Self {
            backend,
            recorder,
            formatter: ReplyFormatter::default(),
        }
    }

    /// Override display formatting.
    pub fn with_formatter(mut self, formatter: ReplyFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Answer a question.
    ///
    /// Blank or overlong questions are rejected without calling the backend
    /// or writing an audit event.
    pub async fn respond(
        &self,
        ctx: &RequestContext,
        question: &str,
        history: &[ChatMessage],
        conversation_id: Option<&str>,
    ) -> ChatTurn {
        let question = question.trim();
        if question.is_empty() || question.chars().count() > MAX_QUESTION_CHARS {
            debug!(chars = question.chars().count(), "Rejected chat question");
            return ChatTurn {
                history: history.to_vec(),
                conversation_id: conversation_id.map(str::to_string),
                source_label: String::new(),
                payload: None,
            };
        }

        let reply = match self.backend.ask(question, conversation_id).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(backend = %self.backend.id(), error = %e, "Assistant call failed");
                AssistantReply {
                    text: RawReply::text(""),
                    sql: None,
                    dataframe: None,
                    source: self.backend.id().to_string(),
                    conversation_id: conversation_id.unwrap_or_default().to_string(),
                    error: true,
                }
            }
        };

        let payload = if reply.error {
            self.formatter.format(&RawReply::text(APOLOGY_TEXT), None)
        } else {
            self.formatter.format(&reply.text, reply.dataframe.as_ref())
        };

        self.recorder.log_chat_turn(
            ctx,
            &reply.source,
            reply.sql.as_deref(),
            question,
            reply.row_count() as u64,
        );

        let mut next = history.to_vec();
        next.push(ChatMessage::user(question));
        next.push(ChatMessage::assistant(payload.content.clone()));

        let conversation_id = Some(reply.conversation_id.clone())
            .filter(|id| !id.is_empty())
            .or_else(|| conversation_id.map(str::to_string));

        ChatTurn {
            history: next,
            conversation_id,
            source_label: source_label(&reply.source),
            payload: Some(payload),
        }
    }

    /// Record a like or dislike on an assistant message.
    pub fn feedback(
        &self,
        ctx: &RequestContext,
        history: &[ChatMessage],
        conversation_id: Option<&str>,
        raw_index: &Value,
        raw_liked: &Value,
    ) -> bool {
        self.recorder
            .log_feedback(ctx, history, conversation_id, raw_index, raw_liked)
    }
}

/// "Answered by" label with the source capitalised.
pub fn source_label(source: &str) -> String {
    let mut chars = source.chars();
    let name: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    };
    format!("Answered by: {}", name)
}
