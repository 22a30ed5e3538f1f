//! Anomaly detection.
//!
//! Three independent detectors produce [`AnomalyRecord`]s:
//! - **Threshold**: a reading exceeds a fixed cutoff on any configured metric
//! - **Statistical**: a point lies above `mean + sigma * std` of its window
//! - **Geometric**: a non-failure reading falls inside the failure risk zone

mod geometric;
mod statistical;
mod threshold;

pub use geometric::{convex_hull, Point, RiskZone};
pub use statistical::{StatisticalDetector, DEFAULT_SIGMA};
pub use threshold::{ThresholdDetector, ThresholdRule};

use serde::{Deserialize, Serialize};
use std::fmt;

/// How an anomaly was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Fixed cutoff exceeded
    Threshold,
    /// Outside the statistical envelope
    Statistical,
    /// Inside the failure risk zone
    Geometric,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Threshold => write!(f, "threshold"),
            Self::Statistical => write!(f, "statistical"),
            Self::Geometric => write!(f, "geometric"),
        }
    }
}

/// A flagged reading.
///
/// Geometric records carry the reading's coordinates in `value` (x) and
/// `threshold` (y); `metric_name` names both fields as `x/y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    /// Asset identifier
    pub asset_id: String,
    /// Metric that triggered the flag
    pub metric_name: String,
    /// Observed value
    pub value: f64,
    /// Cutoff the value was compared against
    pub threshold: f64,
    /// Detection kind
    pub kind: AnomalyKind,
    /// Cycle of the flagged reading
    pub cycle: i64,
}
