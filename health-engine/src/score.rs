//! Baseline-relative health scores.

use serde::{Deserialize, Serialize};

use crate::stats::{mean, round_to};
use crate::types::{EngineError, Result, TelemetrySnapshot};

/// Points in the early-life and recent windows.
pub const BASELINE_WINDOW: usize = 10;

/// Health of one asset relative to its early-life baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    /// Asset identifier
    pub asset_id: String,
    /// Mean of the first window
    pub baseline_value: f64,
    /// Mean of the last window
    pub recent_value: f64,
    /// `recent / baseline * 100`, one decimal; 0 when baseline is not positive
    pub score_pct: f64,
}

/// Score one asset's cycle-ordered series.
///
/// With fewer than `window` points both windows cover the whole series.
pub fn health_score(asset_id: &str, series: &[f64], window: usize) -> Result<HealthScore> {
    if window == 0 {
        return Err(EngineError::invalid("baseline window must be at least 1"));
    }
    let n = series.len().min(window);
    let baseline_value = mean(&series[..n])?;
    let recent_value = mean(&series[series.len() - n..])?;

    let score_pct = if baseline_value > 0.0 {
        round_to(recent_value / baseline_value * 100.0, 1)
    } else {
        0.0
    };

    Ok(HealthScore {
        asset_id: asset_id.to_string(),
        baseline_value,
        recent_value,
        score_pct,
    })
}

/// Score every asset in a snapshot on one field, most degraded first.
pub fn fleet_scores(
    snapshot: &TelemetrySnapshot,
    field: &str,
    window: usize,
) -> Result<Vec<HealthScore>> {
    let mut scores = snapshot
        .series(field)?
        .iter()
        .map(|(asset, series)| health_score(asset, series, window))
        .collect::<Result<Vec<_>>>()?;
    scores.sort_by(|a, b| {
        a.score_pct
            .total_cmp(&b.score_pct)
            .then_with(|| a.asset_id.cmp(&b.asset_id))
    });
    Ok(scores)
}

/// The lowest-scoring asset of a ranked list.
pub fn most_degraded(scores: &[HealthScore]) -> Option<&HealthScore> {
    scores.iter().min_by(|a, b| a.score_pct.total_cmp(&b.score_pct))
}
