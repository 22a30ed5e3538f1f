//! Configuration for the health engine.

use serde::{Deserialize, Serialize};

use crate::anomaly::{StatisticalDetector, ThresholdDetector, ThresholdRule};

/// Tunables for scoring and detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Points in the baseline and recent windows
    pub baseline_window: usize,
    /// Statistical envelope width in standard deviations
    pub sigma: f64,
    /// Rolling band half-width in standard deviations
    pub band_k: f64,
    /// Rolling band window
    pub band_window: usize,
    /// Machining threshold rules
    pub machining_thresholds: Vec<ThresholdRule>,
    /// Heater health score below which a unit is degrading (percent)
    pub degradation_threshold_pct: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            baseline_window: crate::score::BASELINE_WINDOW,
            sigma: crate::anomaly::DEFAULT_SIGMA,
            band_k: crate::band::DEFAULT_BAND_K,
            band_window: 10,
            machining_thresholds: ThresholdDetector::machining().rules().to_vec(),
            degradation_threshold_pct: 95.0,
        }
    }
}

impl EngineConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Threshold detector for machining assets.
    pub fn threshold_detector(&self) -> ThresholdDetector {
        ThresholdDetector::new(self.machining_thresholds.clone())
    }

    /// Statistical detector over a metric.
    pub fn statistical_detector(&self, metric: impl Into<String>) -> StatisticalDetector {
        StatisticalDetector::new(metric).with_sigma(self.sigma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.baseline_window, 10);
        assert_eq!(config.sigma, 3.0);
        assert_eq!(config.band_k, 2.0);
        assert_eq!(config.machining_thresholds.len(), 2);
        assert_eq!(config.degradation_threshold_pct, 95.0);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = EngineConfig::from_yaml("sigma: 2.5\nband_window: 5\n").unwrap();
        assert_eq!(config.sigma, 2.5);
        assert_eq!(config.band_window, 5);
        assert_eq!(config.baseline_window, 10);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = EngineConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(EngineConfig::from_yaml(&yaml).unwrap(), config);
    }
}
