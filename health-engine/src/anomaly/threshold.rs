//! Fixed-cutoff anomaly flagging.

use serde::{Deserialize, Serialize};

use super::{AnomalyKind, AnomalyRecord};
use crate::types::{Reading, Result, TelemetrySnapshot};

/// A metric and the value it must not exceed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    /// Field name
    pub metric: String,
    /// Strict upper cutoff
    pub cutoff: f64,
}

impl ThresholdRule {
    /// Create a rule.
    pub fn new(metric: impl Into<String>, cutoff: f64) -> Self {
        Self {
            metric: metric.into(),
            cutoff,
        }
    }

    fn check(&self, reading: &Reading) -> Result<Option<AnomalyRecord>> {
        let value = reading.field(&self.metric)?;
        Ok((value > self.cutoff).then(|| AnomalyRecord {
            asset_id: reading.asset_id.clone(),
            metric_name: self.metric.clone(),
            value,
            threshold: self.cutoff,
            kind: AnomalyKind::Threshold,
            cycle: reading.cycle,
        }))
    }
}

/// Flags readings exceeding any configured cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdDetector {
    rules: Vec<ThresholdRule>,
}

impl ThresholdDetector {
    /// Create a detector from rules, checked in order.
    pub fn new(rules: Vec<ThresholdRule>) -> Self {
        Self { rules }
    }

    /// Machining defaults: tool wear over 200 minutes or torque over 65 Nm.
    pub fn machining() -> Self {
        Self::new(vec![
            ThresholdRule::new("tool_wear_min", 200.0),
            ThresholdRule::new("torque_nm", 65.0),
        ])
    }

    /// Configured rules.
    pub fn rules(&self) -> &[ThresholdRule] {
        &self.rules
    }

    /// One record per anomalous reading, reporting the first rule it trips.
    pub fn detect(&self, snapshot: &TelemetrySnapshot) -> Result<Vec<AnomalyRecord>> {
        let mut out = Vec::new();
        for reading in &snapshot.readings {
            for rule in &self.rules {
                if let Some(record) = rule.check(reading)? {
                    out.push(record);
                    break;
                }
            }
        }
        Ok(out)
    }

    /// One record per tripped rule per reading.
    pub fn detect_per_metric(&self, snapshot: &TelemetrySnapshot) -> Result<Vec<AnomalyRecord>> {
        let mut out = Vec::new();
        for reading in &snapshot.readings {
            for rule in &self.rules {
                out.extend(rule.check(reading)?);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> TelemetrySnapshot {
        TelemetrySnapshot::new(vec![
            Reading::new("M1", 1).with("tool_wear_min", 210.0).with("torque_nm", 70.0),
            Reading::new("M2", 1).with("tool_wear_min", 200.0).with("torque_nm", 65.0),
            Reading::new("M3", 1).with("tool_wear_min", 10.0).with("torque_nm", 65.5),
        ])
    }

    #[test]
    fn test_one_record_per_reading() {
        let records = ThresholdDetector::machining().detect(&snapshot()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].asset_id, "M1");
        assert_eq!(records[0].metric_name, "tool_wear_min");
        assert_eq!(records[1].asset_id, "M3");
        assert_eq!(records[1].metric_name, "torque_nm");
        assert!(records.iter().all(|r| r.kind == AnomalyKind::Threshold));
    }

    #[test]
    fn test_per_metric_detail() {
        let records = ThresholdDetector::machining()
            .detect_per_metric(&snapshot())
            .unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_cutoff_is_strict() {
        let records = ThresholdDetector::machining().detect(&snapshot()).unwrap();
        assert!(records.iter().all(|r| r.asset_id != "M2"));
    }

    #[test]
    fn test_missing_metric_is_invalid() {
        let s = TelemetrySnapshot::new(vec![Reading::new("M1", 1).with("torque_nm", 1.0)]);
        assert!(ThresholdDetector::machining().detect(&s).is_err());
    }
}
