//! Telemetry source boundary.
//!
//! Engine computations never fetch data; the hub asks a [`TelemetrySource`]
//! for a [`TelemetrySnapshot`] per dataset and hands it over.

use async_trait::async_trait;
use health_engine::{Reading, TelemetrySnapshot};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Field names used across datasets.
pub mod fields {
    pub const TOOL_WEAR: &str = "tool_wear_min";
    pub const TORQUE: &str = "torque_nm";
    pub const ROTATIONAL_SPEED: &str = "rotational_speed_rpm";
    pub const MACHINE_FAILURE: &str = "machine_failure";

    pub const RUL: &str = "remaining_rul";
    pub const SENSOR_2: &str = "sensor_2";
    pub const SENSOR_7: &str = "sensor_7";

    pub const PHASE_A_CURRENT: &str = "ia";
    pub const PHASE_B_CURRENT: &str = "ib";
    pub const PHASE_A_VOLTAGE: &str = "va";
    pub const PHASE_B_VOLTAGE: &str = "vb";
    pub const HAS_FAULT: &str = "has_fault";

    pub const NEUTRAL_CURRENT: &str = "inut";
    pub const OIL_TEMP: &str = "oti";
    pub const WINDING_TEMP: &str = "wti";

    pub const AVG_VOLTAGE: &str = "avg_voltage";
}

/// Datasets a view can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// CNC machining telemetry
    Cnc,
    /// Turbofan run-to-failure cycles
    Engine,
    /// Phase currents and voltages
    Electrical,
    /// Transformer temperatures and neutral current
    Transformer,
    /// Heater discharge voltage
    Heater,
}

impl Dataset {
    /// Warehouse table backing this dataset.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Cnc => "main.predictive_maintenance.cnc_machining",
            Self::Engine => "main.predictive_maintenance.nasa_engine_rul",
            Self::Electrical => "main.predictive_maintenance.electrical_fault",
            Self::Transformer => "main.predictive_maintenance.transformer_reading",
            Self::Heater => "main.predictive_maintenance.heater_readings",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// A dataset could not be fetched.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Failed to load {dataset}: {reason}")]
pub struct DataUnavailable {
    pub dataset: Dataset,
    pub reason: String,
}

/// Where telemetry snapshots come from.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Human-readable name for logs.
    fn describe(&self) -> String;

    /// Fetch the current snapshot of a dataset.
    async fn fetch(&self, dataset: Dataset) -> Result<TelemetrySnapshot, DataUnavailable>;
}

/// Heater assets tracked by the fleet view.
pub const HEATER_ASSETS: [&str; 4] = ["B0005", "B0006", "B0007", "B0018"];

/// Deterministic in-process telemetry for local mode and tests.
///
/// Every fetch of the same dataset returns the same snapshot.
#[derive(Debug, Default)]
pub struct MockTelemetrySource {
    failing: HashSet<Dataset>,
    fetch_count: AtomicU32,
}

impl MockTelemetrySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make fetches of `dataset` fail.
    pub fn failing(mut self, dataset: Dataset) -> Self {
        self.failing.insert(dataset);
        self
    }

    /// Number of fetch calls made so far.
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Snapshot for a dataset, without the failure switch.
    pub fn snapshot(dataset: Dataset) -> TelemetrySnapshot {
        match dataset {
            Dataset::Cnc => cnc(),
            Dataset::Engine => engines(),
            Dataset::Electrical => electrical(),
            Dataset::Transformer => transformer(),
            Dataset::Heater => heaters(),
        }
    }
}

#[async_trait]
impl TelemetrySource for MockTelemetrySource {
    fn describe(&self) -> String {
        "local mock telemetry".to_string()
    }

    async fn fetch(&self, dataset: Dataset) -> Result<TelemetrySnapshot, DataUnavailable> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&dataset) {
            return Err(DataUnavailable {
                dataset,
                reason: "mock source configured to fail".to_string(),
            });
        }
        Ok(Self::snapshot(dataset))
    }
}

const CNC_MACHINES: i64 = 6;
const CNC_CYCLES: i64 = 10;

// Tool wear crosses 200 min on the last cycle for machines 1..=5; M04 has one
// torque spike on cycle 4. Failures: wear above 210 or torque above 70.
fn cnc() -> TelemetrySnapshot {
    let mut readings = Vec::new();
    for i in 0..CNC_MACHINES {
        for cycle in 0..CNC_CYCLES {
            let wear = (cycle * 22 + i * 4) as f64;
            let mut torque = (40 + i * 2 + (cycle * 7 + i * 3) % 5) as f64;
            if i == 3 && cycle == 4 {
                torque = 71.0;
            }
            let failed = wear > 210.0 || torque > 70.0;
            readings.push(
                Reading::new(format!("M{:02}", i + 1), cycle)
                    .with(fields::TOOL_WEAR, wear)
                    .with(fields::TORQUE, torque)
                    .with(fields::ROTATIONAL_SPEED, (1400 + cycle * 10 + i * 3) as f64)
                    .with(fields::MACHINE_FAILURE, if failed { 1.0 } else { 0.0 }),
            );
        }
    }
    TelemetrySnapshot::new(readings)
}

const ENGINE_BASE_RUL: [i64; 6] = [40, 75, 130, 210, 45, 160];
const ENGINE_CYCLES: i64 = 30;

fn engines() -> TelemetrySnapshot {
    let mut readings = Vec::new();
    for (i, base) in ENGINE_BASE_RUL.iter().enumerate() {
        let wear = (i + 1) as f64;
        for cycle in 1..=ENGINE_CYCLES {
            readings.push(
                Reading::new(format!("ENG-{:02}", i + 1), cycle)
                    .with(fields::RUL, (base - cycle + 1) as f64)
                    .with(fields::SENSOR_2, 642.0 + 0.02 * cycle as f64 * wear)
                    .with(fields::SENSOR_7, 554.0 - 0.03 * cycle as f64 * wear),
            );
        }
    }
    TelemetrySnapshot::new(readings)
}

const ELECTRICAL_READINGS: i64 = 40;

fn electrical() -> TelemetrySnapshot {
    let readings = (0..ELECTRICAL_READINGS)
        .map(|n| {
            let fault = n % 8 == 0;
            let surge = if fault { 3.5 } else { 1.0 };
            Reading::new("LINE-1", n)
                .with(fields::PHASE_A_CURRENT, 12.0 * surge + (n % 4) as f64 * 0.1)
                .with(fields::PHASE_B_CURRENT, 11.8 + (n % 3) as f64 * 0.1)
                .with(fields::PHASE_A_VOLTAGE, 230.0 - if fault { 40.0 } else { 0.0 })
                .with(fields::PHASE_B_VOLTAGE, 229.5)
                .with(fields::HAS_FAULT, if fault { 1.0 } else { 0.0 })
        })
        .collect();
    TelemetrySnapshot::new(readings)
}

const TRANSFORMER_READINGS: i64 = 48;
const NEUTRAL_SPIKE_AT: i64 = 30;

fn transformer() -> TelemetrySnapshot {
    let readings = (0..TRANSFORMER_READINGS)
        .map(|n| {
            let inut = if n == NEUTRAL_SPIKE_AT {
                6.0
            } else {
                1.0 + 0.05 * (n % 3) as f64
            };
            Reading::new("TX-01", n)
                .with(fields::NEUTRAL_CURRENT, inut)
                .with(fields::OIL_TEMP, 55.0 + (n % 6) as f64)
                .with(fields::WINDING_TEMP, 62.0 + (n % 4) as f64)
        })
        .collect();
    TelemetrySnapshot::new(readings)
}

const HEATER_CYCLES: i64 = 20;
const HEATER_BASELINE_V: f64 = 4.0;
// Late-life voltage per heater: scores 99.0, 96.5, 90.0, 98.5.
const HEATER_LATE_V: [f64; 4] = [3.96, 3.86, 3.6, 3.94];

fn heaters() -> TelemetrySnapshot {
    let mut readings = Vec::new();
    for (asset, late) in HEATER_ASSETS.iter().zip(HEATER_LATE_V) {
        for cycle in 0..HEATER_CYCLES {
            let v = if cycle < HEATER_CYCLES / 2 {
                HEATER_BASELINE_V
            } else {
                late
            };
            readings.push(Reading::new(*asset, cycle).with(fields::AVG_VOLTAGE, v));
        }
    }
    TelemetrySnapshot::new(readings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_sizes() {
        assert_eq!(MockTelemetrySource::snapshot(Dataset::Cnc).len(), 60);
        assert_eq!(MockTelemetrySource::snapshot(Dataset::Engine).len(), 180);
        assert_eq!(MockTelemetrySource::snapshot(Dataset::Electrical).len(), 40);
        assert_eq!(MockTelemetrySource::snapshot(Dataset::Transformer).len(), 48);
        assert_eq!(MockTelemetrySource::snapshot(Dataset::Heater).len(), 80);
    }

    #[test]
    fn test_heater_assets() {
        let snapshot = MockTelemetrySource::snapshot(Dataset::Heater);
        let assets: Vec<&str> = snapshot.by_asset().keys().copied().collect();
        assert_eq!(assets, HEATER_ASSETS);
    }

    #[tokio::test]
    async fn test_failing_dataset() {
        let source = MockTelemetrySource::new().failing(Dataset::Engine);
        let err = source.fetch(Dataset::Engine).await.unwrap_err();
        assert_eq!(err.dataset, Dataset::Engine);
        assert!(err.to_string().contains("nasa_engine_rul"));
        assert!(source.fetch(Dataset::Heater).await.is_ok());
        assert_eq!(source.fetch_count(), 2);
    }
}
