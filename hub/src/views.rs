//! Role-gated view loading.
//!
//! A load decides access against a fresh policy snapshot, fetches the
//! view's datasets, builds the report and records one `QUERY` audit event.
//! Failed fetches degrade the view to a short status message and are not
//! audited.

use std::sync::Arc;

use access_gate::{resolve, AccessGate, AccessRequest, PolicySource, RequestContext, View};
use audit_ledger::AuditRecorder;
use chrono::{Local, NaiveDate};
use health_engine::{EngineConfig, EngineError, TelemetrySnapshot};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::report::{self, ViewReport};
use crate::source::{DataUnavailable, Dataset, TelemetrySource};

/// Longest status message shown for a degraded view.
pub const MAX_STATUS_CHARS: usize = 120;

/// Result of a view load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ViewOutcome {
    /// Caller has regular views, but not this one
    Denied { role: String },
    /// Caller has no regular views; offer the access request
    RequestAccess { request: AccessRequest },
    /// Report built and audited
    Rendered { report: ViewReport, row_count: u64 },
    /// Data could not be fetched or computed
    Degraded { status: String },
    /// View has no telemetry report
    Unsupported { view: View },
}

#[derive(Debug, thiserror::Error)]
enum LoadError {
    #[error(transparent)]
    Data(#[from] DataUnavailable),
    #[error("Invalid telemetry: {0}")]
    Engine(#[from] EngineError),
}

/// Datasets a view reads; the first is its primary result set.
pub fn datasets(view: View) -> &'static [Dataset] {
    match view {
        View::Overview => &[Dataset::Cnc, Dataset::Engine, Dataset::Electrical, Dataset::Heater],
        View::CncAnalysis => &[Dataset::Cnc],
        View::EngineHealth => &[Dataset::Engine],
        View::ElectricalMonitor => &[Dataset::Electrical, Dataset::Transformer],
        View::HeaterHealth => &[Dataset::Heater],
        View::AuditLog | View::Admin | View::RequestAccess => &[],
    }
}

fn truncate_status(message: &str) -> String {
    message.chars().take(MAX_STATUS_CHARS).collect()
}

/// Loads views on behalf of request contexts.
pub struct ViewLoader<P: PolicySource, S: TelemetrySource> {
    gate: AccessGate<P>,
    source: Arc<S>,
    recorder: AuditRecorder,
    config: EngineConfig,
}

impl<P: PolicySource, S: TelemetrySource> ViewLoader<P, S> {
    pub fn new(gate: AccessGate<P>, source: Arc<S>, recorder: AuditRecorder) -> Self {
        Self {
            gate,
            source,
            recorder,
            config: EngineConfig::default(),
        }
    }

    /// Override engine tuning.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn gate(&self) -> &AccessGate<P> {
        &self.gate
    }

    /// Load a view, scheduling against today's local date.
    pub async fn load(&self, ctx: &RequestContext, view: View) -> ViewOutcome {
        self.load_on(ctx, view, Local::now().date_naive()).await
    }

    /// Load a view with an explicit scheduling date.
    pub async fn load_on(&self, ctx: &RequestContext, view: View, today: NaiveDate) -> ViewOutcome {
        let policy = self.gate.snapshot();
        let visible = resolve(ctx.identity.as_ref(), policy.as_ref());

        if view == View::RequestAccess || !visible.contains(view) {
            if visible.shows_request_access() {
                return ViewOutcome::RequestAccess {
                    request: AccessRequest::new(ctx, policy.as_ref()),
                };
            }
            debug!(view = %view, role = %visible.role, "View not granted");
            return ViewOutcome::Denied {
                role: visible.role,
            };
        }

        let tables = datasets(view);
        if tables.is_empty() {
            return ViewOutcome::Unsupported { view };
        }

        match self.render(view, today).await {
            Ok((report, row_count)) => {
                let names: Vec<&str> = tables.iter().map(Dataset::table).collect();
                self.recorder.log_view_load(
                    ctx,
                    &names,
                    &format!("{} tab load", view.name()),
                    row_count,
                );
                info!(view = %view, user = %ctx.email(), rows = row_count, "View loaded");
                ViewOutcome::Rendered { report, row_count }
            }
            Err(e) => {
                warn!(view = %view, error = %e, "View degraded");
                ViewOutcome::Degraded {
                    status: truncate_status(&e.to_string()),
                }
            }
        }
    }

    async fn fetch(&self, dataset: Dataset) -> Result<TelemetrySnapshot, LoadError> {
        Ok(self.source.fetch(dataset).await?)
    }

    async fn render(&self, view: View, today: NaiveDate) -> Result<(ViewReport, u64), LoadError> {
        let config = &self.config;
        let (report, primary_rows) = match view {
            View::Overview => {
                let cnc = self.fetch(Dataset::Cnc).await?;
                let engines = self.fetch(Dataset::Engine).await?;
                let electrical = self.fetch(Dataset::Electrical).await?;
                let heaters = self.fetch(Dataset::Heater).await?;
                let report = report::overview(&cnc, &engines, &electrical, &heaters, config)?;
                (ViewReport::Overview(report), cnc.len())
            }
            View::CncAnalysis => {
                let cnc = self.fetch(Dataset::Cnc).await?;
                (ViewReport::Cnc(report::cnc(&cnc, config)?), cnc.len())
            }
            View::EngineHealth => {
                let engines = self.fetch(Dataset::Engine).await?;
                (
                    ViewReport::Engine(report::engine(&engines, config, today)?),
                    engines.len(),
                )
            }
            View::ElectricalMonitor => {
                let electrical = self.fetch(Dataset::Electrical).await?;
                let transformer = self.fetch(Dataset::Transformer).await?;
                (
                    ViewReport::Electrical(report::electrical(&electrical, &transformer, config)?),
                    electrical.len(),
                )
            }
            View::HeaterHealth => {
                let heaters = self.fetch(Dataset::Heater).await?;
                (ViewReport::Heater(report::heater(&heaters, config)?), heaters.len())
            }
            View::AuditLog | View::Admin | View::RequestAccess => {
                return Err(LoadError::Engine(EngineError::InvalidInput(format!(
                    "{} has no telemetry report",
                    view
                ))))
            }
        };
        Ok((report, primary_rows as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_truncated() {
        let long = "x".repeat(300);
        assert_eq!(truncate_status(&long).chars().count(), MAX_STATUS_CHARS);
        assert_eq!(truncate_status("short"), "short");
    }

    #[test]
    fn test_every_report_view_has_a_primary_dataset() {
        for view in View::REGULAR {
            let expected = !matches!(view, View::AuditLog | View::Admin);
            assert_eq!(!datasets(view).is_empty(), expected, "{}", view);
        }
        assert!(datasets(View::RequestAccess).is_empty());
    }
}
