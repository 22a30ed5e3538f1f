//! Core types for the health engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single reading for one asset at one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Asset identifier (machine id, unit number, zone)
    pub asset_id: String,
    /// Operating cycle or timestamp ordinal
    pub cycle: i64,
    /// Named numeric fields
    pub fields: BTreeMap<String, f64>,
}

impl Reading {
    /// Create an empty reading.
    pub fn new(asset_id: impl Into<String>, cycle: i64) -> Self {
        Self {
            asset_id: asset_id.into(),
            cycle,
            fields: BTreeMap::new(),
        }
    }

    /// Add a field.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// A finite field value.
    pub fn field(&self, name: &str) -> Result<f64> {
        match self.fields.get(name) {
            Some(v) if v.is_finite() => Ok(*v),
            Some(v) => Err(EngineError::InvalidInput(format!(
                "{}@{}: field `{}` is not finite ({})",
                self.asset_id, self.cycle, name, v
            ))),
            None => Err(EngineError::InvalidInput(format!(
                "{}@{}: missing field `{}`",
                self.asset_id, self.cycle, name
            ))),
        }
    }
}

/// Readings supplied by a telemetry fetch. Never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Readings in fetch order
    pub readings: Vec<Reading>,
}

impl TelemetrySnapshot {
    /// Wrap readings.
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    /// Number of readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether there are no readings.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Readings grouped per asset, each group ordered by cycle.
    pub fn by_asset(&self) -> BTreeMap<&str, Vec<&Reading>> {
        let mut groups: BTreeMap<&str, Vec<&Reading>> = BTreeMap::new();
        for r in &self.readings {
            groups.entry(r.asset_id.as_str()).or_default().push(r);
        }
        for group in groups.values_mut() {
            group.sort_by_key(|r| r.cycle);
        }
        groups
    }

    /// One field's values per asset, ordered by cycle.
    pub fn series(&self, field: &str) -> Result<BTreeMap<String, Vec<f64>>> {
        self.by_asset()
            .into_iter()
            .map(|(asset, readings)| {
                let values = readings
                    .iter()
                    .map(|r| r.field(field))
                    .collect::<Result<Vec<_>>>()?;
                Ok((asset.to_string(), values))
            })
            .collect()
    }
}

/// Error types for the health engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// Empty, non-numeric or otherwise malformed input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EngineError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
