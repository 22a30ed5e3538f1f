//! Anomaly and health engine for predictive maintenance telemetry.
//!
//! Every function here is a pure computation over an already-fetched
//! [`TelemetrySnapshot`] or series. Nothing performs I/O; malformed input is
//! reported as [`EngineError::InvalidInput`] and never silently zeroed.
//!
//! # Architecture
//!
//! ```text
//! TelemetrySnapshot
//!    │
//!    ├── score     ── per-asset HealthScore, ranked most-degraded first
//!    ├── bucket    ── severity tiers (RUL 3-tier, fleet 4-tier, heater)
//!    ├── anomaly   ── threshold / statistical / geometric records
//!    ├── band      ── rolling mean ± k·std envelope
//!    ├── kpi       ── latest RUL, fleet summary, normalisation
//!    └── schedule  ── maintenance tasks from current RUL
//! ```

pub mod anomaly;
pub mod band;
pub mod bucket;
pub mod config;
pub mod kpi;
pub mod schedule;
pub mod score;
pub mod stats;
pub mod types;

// Re-export main types
pub use anomaly::{AnomalyKind, AnomalyRecord};
pub use band::{rolling_band, BandPoint};
pub use bucket::{bucket_counts, Bucket, FleetHealthTier, HeaterHealthTier, RulStatus};
pub use config::EngineConfig;
pub use schedule::{derive_schedule, MaintenanceTask, Priority, Schedule};
pub use score::{fleet_scores, health_score, HealthScore};
pub use types::*;
