//! Predictive Maintenance Hub
//!
//! Orchestrates a view load end to end:
//!
//! ```text
//! RequestContext ──► AccessGate ──► TelemetrySource ──► health-engine ──► AuditRecorder
//!                     (denied)       (degraded)          (ViewReport)       (QUERY event)
//! ```
//!
//! Chat turns go through `reply_adapter::ChatService`; this crate only
//! supplies configuration and the mock collaborators for local mode.

pub mod config;
pub mod report;
pub mod source;
pub mod views;

pub use config::{Args, Command, DataMode};
pub use report::ViewReport;
pub use source::{DataUnavailable, Dataset, MockTelemetrySource, TelemetrySource};
pub use views::{ViewLoader, ViewOutcome, MAX_STATUS_CHARS};
