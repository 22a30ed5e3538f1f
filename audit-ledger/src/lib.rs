//! Audit ledger for the maintenance hub.
//!
//! One immutable [`AuditEvent`] per user-visible action, appended to an
//! [`AuditSink`]. Recording never fails the caller: sink errors are reported
//! on the `audit` tracing target and swallowed.

pub mod event;
pub mod feedback;
pub mod recorder;
pub mod sink;
pub mod transcript;

pub use event::{ActionType, AuditEvent, AI_GENERATED_SOURCE};
pub use feedback::{coerce_liked, resolve_message_index, validate_feedback};
pub use recorder::AuditRecorder;
pub use sink::{AuditError, AuditSink, JsonlSink, MemorySink, UnavailableSink};
pub use transcript::{ChatMessage, ChatRole};
