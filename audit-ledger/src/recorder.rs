//! Audit recorder: the only way the rest of the hub writes to the ledger.

use std::path::PathBuf;
use std::sync::Arc;

use access_gate::RequestContext;
use serde_json::Value;
use tracing::{debug, error};

use crate::event::AuditEvent;
use crate::feedback::validate_feedback;
use crate::sink::{AuditSink, JsonlSink, UnavailableSink};
use crate::transcript::ChatMessage;

/// Writes audit events, swallowing sink failures.
#[derive(Clone)]
pub struct AuditRecorder {
    sink: Arc<dyn AuditSink>,
}

impl AuditRecorder {
    /// Create a recorder over a sink.
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Recorder over a JSONL file.
    ///
    /// An unopenable file does not stop the caller: the failure is reported on
    /// the `audit` target and every later append reports the same reason.
    pub fn open_jsonl(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match JsonlSink::open(&path) {
            Ok(sink) => Self::new(Arc::new(sink)),
            Err(e) => {
                error!(
                    target: "audit",
                    path = %path.display(),
                    error = %e,
                    "Audit log unavailable, events will not be persisted"
                );
                Self::new(Arc::new(UnavailableSink::new(format!(
                    "{}: {}",
                    path.display(),
                    e
                ))))
            }
        }
    }

    /// Append an event. Failures are reported on the `audit` target only.
    pub fn log(&self, event: AuditEvent) {
        if let Err(e) = self.sink.append(&event) {
            error!(
                target: "audit",
                action = ?event.action_type,
                user = %event.user_email,
                error = %e,
                "Failed to write audit event"
            );
        }
    }

    /// Record a view load.
    pub fn log_view_load(
        &self,
        ctx: &RequestContext,
        source_tables: &[&str],
        description: &str,
        row_count: u64,
    ) {
        self.log(AuditEvent::query(ctx, source_tables, description, row_count));
    }

    /// Record a chat turn. `sql` is preferred over the question when known.
    pub fn log_chat_turn(
        &self,
        ctx: &RequestContext,
        ai_source: &str,
        sql: Option<&str>,
        question: &str,
        row_count: u64,
    ) {
        let query_text = sql.filter(|s| !s.trim().is_empty()).unwrap_or(question);
        self.log(AuditEvent::chat(ctx, ai_source, query_text, row_count));
    }

    /// Record feedback if it targets an assistant message in `history`.
    ///
    /// Returns whether an event was written to the sink queue.
    pub fn log_feedback(
        &self,
        ctx: &RequestContext,
        history: &[ChatMessage],
        conversation_id: Option<&str>,
        raw_index: &Value,
        raw_liked: &Value,
    ) -> bool {
        match validate_feedback(history, raw_index, raw_liked) {
            Some((index, liked)) => {
                self.log(AuditEvent::feedback(ctx, conversation_id, index, liked));
                true
            }
            None => {
                debug!(index = %raw_index, "Ignoring feedback not attached to an assistant message");
                false
            }
        }
    }
}
