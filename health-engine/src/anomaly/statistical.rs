//! Sigma-envelope anomaly flagging over an observed window.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AnomalyKind, AnomalyRecord};
use crate::stats::{mean, sample_std};
use crate::types::{EngineError, Result, TelemetrySnapshot};

/// Standard deviations above the mean before a point is flagged.
pub const DEFAULT_SIGMA: f64 = 3.0;

/// Flags points above `mean + sigma * std` of each asset's series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalDetector {
    /// Field to examine
    pub metric: String,
    /// Envelope width in standard deviations
    pub sigma: f64,
}

impl StatisticalDetector {
    /// Create a detector with the default 3-sigma envelope.
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            sigma: DEFAULT_SIGMA,
        }
    }

    /// Override the envelope width.
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Upper limit for a series. `None` when the series is constant.
    pub fn limit(&self, values: &[f64]) -> Result<Option<f64>> {
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(EngineError::invalid(format!("invalid sigma {}", self.sigma)));
        }
        let std = sample_std(values)?;
        if std == 0.0 {
            return Ok(None);
        }
        Ok(Some(mean(values)? + self.sigma * std))
    }

    /// Indices of flagged points in a plain series.
    pub fn flag_series(&self, values: &[f64]) -> Result<Vec<usize>> {
        Ok(match self.limit(values)? {
            Some(limit) => values
                .iter()
                .enumerate()
                .filter(|(_, v)| **v > limit)
                .map(|(i, _)| i)
                .collect(),
            None => Vec::new(),
        })
    }

    /// Flag readings per asset over the snapshot.
    pub fn detect(&self, snapshot: &TelemetrySnapshot) -> Result<Vec<AnomalyRecord>> {
        let mut out = Vec::new();
        for (asset, readings) in snapshot.by_asset() {
            let values = readings
                .iter()
                .map(|r| r.field(&self.metric))
                .collect::<Result<Vec<_>>>()?;
            let Some(limit) = self.limit(&values)? else {
                debug!(asset = %asset, metric = %self.metric, "Constant series, nothing flagged");
                continue;
            };
            for (reading, value) in readings.iter().zip(values) {
                if value > limit {
                    out.push(AnomalyRecord {
                        asset_id: asset.to_string(),
                        metric_name: self.metric.clone(),
                        value,
                        threshold: limit,
                        kind: AnomalyKind::Statistical,
                        cycle: reading.cycle,
                    });
                }
            }
        }
        Ok(out)
    }

    /// Flag readings against one limit computed over the whole snapshot.
    ///
    /// Returns the limit alongside the records so callers report the same
    /// threshold they flagged with.
    pub fn detect_pooled(
        &self,
        snapshot: &TelemetrySnapshot,
    ) -> Result<(Option<f64>, Vec<AnomalyRecord>)> {
        let values = snapshot
            .readings
            .iter()
            .map(|r| r.field(&self.metric))
            .collect::<Result<Vec<_>>>()?;
        let Some(limit) = self.limit(&values)? else {
            return Ok((None, Vec::new()));
        };
        let out = snapshot
            .readings
            .iter()
            .zip(values)
            .filter(|(_, value)| *value > limit)
            .map(|(reading, value)| AnomalyRecord {
                asset_id: reading.asset_id.clone(),
                metric_name: self.metric.clone(),
                value,
                threshold: limit,
                kind: AnomalyKind::Statistical,
                cycle: reading.cycle,
            })
            .collect();
        Ok((Some(limit), out))
    }
}
