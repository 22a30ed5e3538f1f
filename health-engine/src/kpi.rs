//! Fleet-level indicators.

use serde::{Deserialize, Serialize};

use crate::bucket::{Bucket, RulStatus};
use crate::stats::{check_finite, round_to};
use crate::types::{EngineError, Result, TelemetrySnapshot};

/// Latest value of `field` per asset (by cycle), lowest first.
pub fn latest_by_asset(snapshot: &TelemetrySnapshot, field: &str) -> Result<Vec<(String, f64)>> {
    let mut latest = Vec::new();
    for (asset, readings) in snapshot.by_asset() {
        if let Some(last) = readings.last() {
            latest.push((asset.to_string(), last.field(field)?));
        }
    }
    latest.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    Ok(latest)
}

/// Status counts and average over a fleet's current RUL values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulSummary {
    pub critical: usize,
    pub warning: usize,
    pub healthy: usize,
    /// Truncated fleet average; 0 for an empty fleet
    pub average_rul: i64,
}

/// Summarise current RUL values.
pub fn rul_summary(values: &[f64]) -> Result<RulSummary> {
    let mut summary = RulSummary {
        critical: 0,
        warning: 0,
        healthy: 0,
        average_rul: 0,
    };
    for v in values {
        match RulStatus::classify(*v)? {
            RulStatus::Critical => summary.critical += 1,
            RulStatus::Warning => summary.warning += 1,
            RulStatus::Healthy => summary.healthy += 1,
        }
    }
    if !values.is_empty() {
        summary.average_rul = (values.iter().sum::<f64>() / values.len() as f64) as i64;
    }
    Ok(summary)
}

/// Scale a profile into `[0, 1]`. A constant profile maps to zeros.
pub fn min_max_normalize(values: &[f64]) -> Result<Vec<f64>> {
    check_finite(values)?;
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = hi - lo;
    Ok(values
        .iter()
        .map(|v| if range > 0.0 { (v - lo) / range } else { 0.0 })
        .collect())
}

/// Percentage of readings whose `label` field is positive, one decimal.
pub fn fault_rate_pct(snapshot: &TelemetrySnapshot, label: &str) -> Result<f64> {
    if snapshot.is_empty() {
        return Err(EngineError::invalid("fault rate of empty snapshot"));
    }
    let mut faults = 0usize;
    for r in &snapshot.readings {
        if r.field(label)? > 0.0 {
            faults += 1;
        }
    }
    Ok(round_to(faults as f64 / snapshot.len() as f64 * 100.0, 1))
}
