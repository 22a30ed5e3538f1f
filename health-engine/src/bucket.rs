//! Severity buckets.
//!
//! Each partition is a fixed, ordered list of tiers with ascending lower
//! bounds. A value belongs to the highest tier whose lower bound it reaches;
//! the first tier is unbounded below and the last unbounded above, so every
//! finite value lands in exactly one tier.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{EngineError, Result};

/// A fixed, exhaustive, disjoint partition of a continuous metric.
pub trait Bucket: Copy + PartialEq + Sized + 'static {
    /// Tiers from most to least severe.
    const TIERS: &'static [Self];

    /// Lower bounds of `TIERS[1..]`, ascending and inclusive.
    const CUTS: &'static [f64];

    /// Display label.
    fn label(&self) -> &'static str;

    /// Classify a value.
    fn classify(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(EngineError::invalid(format!(
                "cannot bucket non-numeric value {}",
                value
            )));
        }
        let idx = Self::CUTS.iter().take_while(|cut| value >= **cut).count();
        Ok(Self::TIERS[idx])
    }
}

/// Three-tier remaining-useful-life status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RulStatus {
    /// RUL < 50
    Critical,
    /// 50 <= RUL < 100
    Warning,
    /// RUL >= 100
    Healthy,
}

impl Bucket for RulStatus {
    const TIERS: &'static [Self] = &[Self::Critical, Self::Warning, Self::Healthy];
    const CUTS: &'static [f64] = &[50.0, 100.0];

    fn label(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Warning => "Warning",
            Self::Healthy => "Healthy",
        }
    }
}

/// Four-tier fleet-wide health classification over RUL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FleetHealthTier {
    /// RUL < 20
    FailureImminent,
    /// 20 <= RUL < 50
    Critical,
    /// 50 <= RUL < 125
    Warning,
    /// RUL >= 125
    Safe,
}

impl Bucket for FleetHealthTier {
    const TIERS: &'static [Self] = &[
        Self::FailureImminent,
        Self::Critical,
        Self::Warning,
        Self::Safe,
    ];
    const CUTS: &'static [f64] = &[20.0, 50.0, 125.0];

    fn label(&self) -> &'static str {
        match self {
            Self::FailureImminent => "Failure Imminent",
            Self::Critical => "Critical",
            Self::Warning => "Warning",
            Self::Safe => "Safe",
        }
    }
}

/// Heater health tiers over a health score percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeaterHealthTier {
    /// Score below the 95% degradation line
    Critical,
    /// 95 <= score < 98
    Warning,
    /// score >= 98
    Good,
}

impl Bucket for HeaterHealthTier {
    const TIERS: &'static [Self] = &[Self::Critical, Self::Warning, Self::Good];
    const CUTS: &'static [f64] = &[95.0, 98.0];

    fn label(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Warning => "Warning",
            Self::Good => "Good",
        }
    }
}

macro_rules! impl_display {
    ($($t:ty),*) => {$(
        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    )*};
}

impl_display!(RulStatus, FleetHealthTier, HeaterHealthTier);

/// Count values per tier, every tier present, in tier order.
pub fn bucket_counts<B: Bucket>(values: &[f64]) -> Result<Vec<(B, usize)>> {
    let mut counts: Vec<(B, usize)> = B::TIERS.iter().map(|t| (*t, 0)).collect();
    for v in values {
        let tier = B::classify(*v)?;
        if let Some(slot) = counts.iter_mut().find(|(t, _)| *t == tier) {
            slot.1 += 1;
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rul_boundaries() {
        assert_eq!(RulStatus::classify(49.9).unwrap(), RulStatus::Critical);
        assert_eq!(RulStatus::classify(50.0).unwrap(), RulStatus::Warning);
        assert_eq!(RulStatus::classify(99.99).unwrap(), RulStatus::Warning);
        assert_eq!(RulStatus::classify(100.0).unwrap(), RulStatus::Healthy);
        assert_eq!(RulStatus::classify(-5.0).unwrap(), RulStatus::Critical);
    }

    #[test]
    fn test_fleet_boundaries() {
        assert_eq!(FleetHealthTier::classify(0.0).unwrap(), FleetHealthTier::FailureImminent);
        assert_eq!(FleetHealthTier::classify(20.0).unwrap(), FleetHealthTier::Critical);
        assert_eq!(FleetHealthTier::classify(50.0).unwrap(), FleetHealthTier::Warning);
        assert_eq!(FleetHealthTier::classify(124.9).unwrap(), FleetHealthTier::Warning);
        assert_eq!(FleetHealthTier::classify(125.0).unwrap(), FleetHealthTier::Safe);
        assert_eq!(FleetHealthTier::classify(1e9).unwrap(), FleetHealthTier::Safe);
    }

    #[test]
    fn test_heater_boundaries() {
        assert_eq!(HeaterHealthTier::classify(94.9).unwrap(), HeaterHealthTier::Critical);
        assert_eq!(HeaterHealthTier::classify(95.0).unwrap(), HeaterHealthTier::Warning);
        assert_eq!(HeaterHealthTier::classify(98.0).unwrap(), HeaterHealthTier::Good);
    }

    #[test]
    fn test_partition_is_exhaustive_and_disjoint() {
        let mut v = -10.0;
        while v < 200.0 {
            let tier = FleetHealthTier::classify(v).unwrap();
            let matching = FleetHealthTier::TIERS
                .iter()
                .enumerate()
                .filter(|(i, _)| {
                    let lo = if *i == 0 { f64::NEG_INFINITY } else { FleetHealthTier::CUTS[i - 1] };
                    let hi = FleetHealthTier::CUTS.get(*i).copied().unwrap_or(f64::INFINITY);
                    v >= lo && v < hi
                })
                .map(|(_, t)| *t)
                .collect::<Vec<_>>();
            assert_eq!(matching, vec![tier]);
            v += 0.5;
        }
    }

    #[test]
    fn test_non_numeric_rejected() {
        assert!(RulStatus::classify(f64::NAN).is_err());
    }

    #[test]
    fn test_counts_keep_empty_tiers() {
        let counts = bucket_counts::<RulStatus>(&[10.0, 20.0, 150.0]).unwrap();
        assert_eq!(
            counts,
            vec![
                (RulStatus::Critical, 2),
                (RulStatus::Warning, 0),
                (RulStatus::Healthy, 1)
            ]
        );
    }
}
