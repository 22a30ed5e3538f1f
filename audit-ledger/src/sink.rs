//! Append-only audit sinks.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::info;

use crate::event::AuditEvent;

/// Error types for audit writes.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Audit write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audit event could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Audit sink lock poisoned")]
    Poisoned,

    #[error("Audit sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for audit events.
///
/// One blocking append per event. Implementations serialize concurrent
/// writers and must keep submission order.
pub trait AuditSink: Send + Sync {
    /// Append one event.
    fn append(&self, event: &AuditEvent) -> Result<(), AuditError>;
}

/// Sink writing one JSON object per line, flushed after each append.
pub struct JsonlSink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlSink {
    /// Open (or create) the log file for appending, creating parent directories.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AuditError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        info!("Audit logging initialized to {}", path.display());
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path,
        })
    }

    /// The log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonlSink {
    fn append(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let line = event.to_jsonl()?;
        let mut writer = self.writer.lock().map_err(|_| AuditError::Poisoned)?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

/// Stand-in for a sink that could not be opened. Every append fails with the
/// original reason so each lost event is still reported.
#[derive(Debug, Clone)]
pub struct UnavailableSink {
    reason: String,
}

impl UnavailableSink {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl AuditSink for UnavailableSink {
    fn append(&self, _event: &AuditEvent) -> Result<(), AuditError> {
        Err(AuditError::Unavailable(self.reason.clone()))
    }
}

/// In-process sink for local mock mode and tests.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events in submission order.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemorySink {
    fn append(&self, event: &AuditEvent) -> Result<(), AuditError> {
        self.events
            .lock()
            .map_err(|_| AuditError::Poisoned)?
            .push(event.clone());
        Ok(())
    }
}
