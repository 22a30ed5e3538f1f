//! Per-view reports assembled from engine computations.
//!
//! Builders are pure: they take already-fetched snapshots and return a
//! report or the engine's `InvalidInput` error.

use chrono::NaiveDate;
use health_engine::anomaly::RiskZone;
use health_engine::kpi::{fault_rate_pct, latest_by_asset, min_max_normalize, rul_summary, RulSummary};
use health_engine::score::most_degraded;
use health_engine::stats::{mean, round_to};
use health_engine::{
    bucket_counts, derive_schedule, fleet_scores, rolling_band, AnomalyRecord, BandPoint, Bucket,
    EngineConfig, EngineError, FleetHealthTier, HealthScore, HeaterHealthTier, Result, RulStatus,
    Schedule, TelemetrySnapshot,
};
use serde::Serialize;

use crate::source::fields;

/// Number of assets in one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierCount {
    pub tier: String,
    pub count: usize,
}

fn tier_counts<B: Bucket + std::fmt::Display>(values: &[f64]) -> Result<Vec<TierCount>> {
    Ok(bucket_counts::<B>(values)?
        .into_iter()
        .map(|(tier, count)| TierCount {
            tier: tier.to_string(),
            count,
        })
        .collect())
}

/// Current remaining useful life of one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetRul {
    pub asset_id: String,
    pub rul: f64,
    pub status: RulStatus,
}

/// Fleet-wide KPI cards and alerts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewReport {
    pub avg_tool_wear: f64,
    pub total_failures: usize,
    pub avg_rul: i64,
    pub critical_engines: usize,
    pub elec_fault_rate_pct: f64,
    pub fleet_health: Vec<TierCount>,
    pub most_degraded_heater: Option<HealthScore>,
    pub alerts: Vec<AnomalyRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CncReport {
    pub machines: usize,
    pub failures: usize,
    pub threshold_anomalies: Vec<AnomalyRecord>,
    /// Failure region over (rotational speed, torque)
    pub risk_zone: RiskZone,
    pub zone_anomalies: Vec<AnomalyRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineReport {
    pub summary: RulSummary,
    pub fleet_health: Vec<TierCount>,
    /// Lowest RUL first
    pub latest: Vec<AssetRul>,
    pub schedule: Schedule,
    /// Engine whose sensor trend is banded
    pub band_asset: Option<String>,
    pub sensor_band: Vec<BandPoint>,
    pub band_excursions: Vec<usize>,
    /// Same series scaled into [0, 1]
    pub sensor_profile: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectricalReport {
    pub fault_rate_pct: f64,
    pub faults: usize,
    pub neutral_current_limit: Option<f64>,
    pub neutral_current_anomalies: Vec<AnomalyRecord>,
    pub avg_oil_temp: f64,
    pub avg_winding_temp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaterReport {
    /// Most degraded first
    pub scores: Vec<HealthScore>,
    pub tiers: Vec<TierCount>,
    /// Assets scoring below the degradation line
    pub degrading: Vec<String>,
    pub degradation_threshold_pct: f64,
}

/// A rendered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewReport {
    Overview(OverviewReport),
    Cnc(CncReport),
    Engine(EngineReport),
    Electrical(ElectricalReport),
    Heater(HeaterReport),
}

fn count_positive(snapshot: &TelemetrySnapshot, field: &str) -> Result<usize> {
    let mut n = 0;
    for r in &snapshot.readings {
        if r.field(field)? > 0.0 {
            n += 1;
        }
    }
    Ok(n)
}

fn column(snapshot: &TelemetrySnapshot, field: &str) -> Result<Vec<f64>> {
    snapshot.readings.iter().map(|r| r.field(field)).collect()
}

fn latest_rul(engines: &TelemetrySnapshot) -> Result<Vec<(String, f64)>> {
    latest_by_asset(engines, fields::RUL)
}

pub fn overview(
    cnc: &TelemetrySnapshot,
    engines: &TelemetrySnapshot,
    electrical: &TelemetrySnapshot,
    heaters: &TelemetrySnapshot,
    config: &EngineConfig,
) -> Result<OverviewReport> {
    let ruls: Vec<f64> = latest_rul(engines)?.into_iter().map(|(_, rul)| rul).collect();
    let summary = rul_summary(&ruls)?;
    let scores = fleet_scores(heaters, fields::AVG_VOLTAGE, config.baseline_window)?;

    Ok(OverviewReport {
        avg_tool_wear: round_to(mean(&column(cnc, fields::TOOL_WEAR)?)?, 1),
        total_failures: count_positive(cnc, fields::MACHINE_FAILURE)?,
        avg_rul: summary.average_rul,
        critical_engines: summary.critical,
        elec_fault_rate_pct: fault_rate_pct(electrical, fields::HAS_FAULT)?,
        fleet_health: tier_counts::<FleetHealthTier>(&ruls)?,
        most_degraded_heater: most_degraded(&scores).cloned(),
        alerts: config.threshold_detector().detect(cnc)?,
    })
}

pub fn cnc(snapshot: &TelemetrySnapshot, config: &EngineConfig) -> Result<CncReport> {
    let zone = RiskZone::from_snapshot(
        snapshot,
        fields::ROTATIONAL_SPEED,
        fields::TORQUE,
        fields::MACHINE_FAILURE,
    )?;
    let zone_anomalies = zone.detect(
        snapshot,
        fields::ROTATIONAL_SPEED,
        fields::TORQUE,
        fields::MACHINE_FAILURE,
    )?;

    Ok(CncReport {
        machines: snapshot.by_asset().len(),
        failures: count_positive(snapshot, fields::MACHINE_FAILURE)?,
        threshold_anomalies: config.threshold_detector().detect(snapshot)?,
        risk_zone: zone,
        zone_anomalies,
    })
}

pub fn engine(
    snapshot: &TelemetrySnapshot,
    config: &EngineConfig,
    today: NaiveDate,
) -> Result<EngineReport> {
    let latest = latest_rul(snapshot)?;
    let ruls: Vec<f64> = latest.iter().map(|(_, rul)| *rul).collect();

    let mut rows = Vec::with_capacity(latest.len());
    for (asset_id, rul) in &latest {
        rows.push(AssetRul {
            asset_id: asset_id.clone(),
            rul: *rul,
            status: RulStatus::classify(*rul)?,
        });
    }

    // Band the sensor trend of the engine closest to failure.
    let band_asset = latest.first().map(|(asset, _)| asset.clone());
    let (sensor_band, sensor_profile) = match &band_asset {
        Some(asset) => {
            let series = snapshot.series(fields::SENSOR_2)?;
            let values = series
                .get(asset)
                .ok_or_else(|| EngineError::InvalidInput(format!("no {} series for {}", fields::SENSOR_2, asset)))?;
            (
                rolling_band(values, config.band_window, config.band_k)?,
                min_max_normalize(values)?,
            )
        }
        None => (Vec::new(), Vec::new()),
    };

    Ok(EngineReport {
        summary: rul_summary(&ruls)?,
        fleet_health: tier_counts::<FleetHealthTier>(&ruls)?,
        schedule: derive_schedule(&latest, today)?,
        latest: rows,
        band_asset,
        band_excursions: health_engine::band::excursions(&sensor_band),
        sensor_band,
        sensor_profile,
    })
}

pub fn electrical(
    electrical: &TelemetrySnapshot,
    transformer: &TelemetrySnapshot,
    config: &EngineConfig,
) -> Result<ElectricalReport> {
    let (neutral_current_limit, neutral_current_anomalies) = config
        .statistical_detector(fields::NEUTRAL_CURRENT)
        .detect_pooled(transformer)?;

    Ok(ElectricalReport {
        fault_rate_pct: fault_rate_pct(electrical, fields::HAS_FAULT)?,
        faults: count_positive(electrical, fields::HAS_FAULT)?,
        neutral_current_limit,
        neutral_current_anomalies,
        avg_oil_temp: round_to(mean(&column(transformer, fields::OIL_TEMP)?)?, 1),
        avg_winding_temp: round_to(mean(&column(transformer, fields::WINDING_TEMP)?)?, 1),
    })
}

pub fn heater(snapshot: &TelemetrySnapshot, config: &EngineConfig) -> Result<HeaterReport> {
    let scores = fleet_scores(snapshot, fields::AVG_VOLTAGE, config.baseline_window)?;
    let values: Vec<f64> = scores.iter().map(|s| s.score_pct).collect();
    let degrading = scores
        .iter()
        .filter(|s| s.score_pct < config.degradation_threshold_pct)
        .map(|s| s.asset_id.clone())
        .collect();

    Ok(HeaterReport {
        tiers: tier_counts::<HeaterHealthTier>(&values)?,
        scores,
        degrading,
        degradation_threshold_pct: config.degradation_threshold_pct,
    })
}
