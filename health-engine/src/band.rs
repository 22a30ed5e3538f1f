//! Rolling deviation band.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::stats::{check_finite, mean, sample_std};
use crate::types::{EngineError, Result};

/// Default band half-width in standard deviations.
pub const DEFAULT_BAND_K: f64 = 2.0;

/// One point of the band, aligned with the input series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPoint {
    /// Raw reading
    pub value: f64,
    /// Rolling mean
    pub mean: f64,
    /// Rolling sample standard deviation (0 for a single point)
    pub std: f64,
    /// `mean + k * std`
    pub upper: f64,
    /// `mean - k * std`
    pub lower: f64,
}

impl BandPoint {
    /// Whether the raw reading exits `[lower, upper]`.
    pub fn is_outside(&self) -> bool {
        self.value > self.upper || self.value < self.lower
    }
}

/// Rolling mean ± `k`·std over a trailing window of `window` points.
///
/// Defined from the first point onward: until `window` points are available
/// the band uses however many there are.
pub fn rolling_band(values: &[f64], window: usize, k: f64) -> Result<Vec<BandPoint>> {
    if window == 0 {
        return Err(EngineError::invalid("band window must be at least 1"));
    }
    if values.is_empty() {
        return Err(EngineError::invalid("band over empty series"));
    }
    check_finite(values)?;

    let mut buf: VecDeque<f64> = VecDeque::with_capacity(window);
    let mut out = Vec::with_capacity(values.len());
    for &value in values {
        if buf.len() == window {
            buf.pop_front();
        }
        buf.push_back(value);

        let (head, tail) = buf.as_slices();
        let win: Vec<f64> = head.iter().chain(tail).copied().collect();
        let m = mean(&win)?;
        let s = sample_std(&win)?;
        out.push(BandPoint {
            value,
            mean: m,
            std: s,
            upper: m + k * s,
            lower: m - k * s,
        });
    }
    Ok(out)
}

/// Indices of points outside their band.
pub fn excursions(band: &[BandPoint]) -> Vec<usize> {
    band.iter()
        .enumerate()
        .filter(|(_, p)| p.is_outside())
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_series_collapses() {
        let band = rolling_band(&[10.0, 10.0, 10.0, 10.0], 3, DEFAULT_BAND_K).unwrap();
        for p in &band {
            assert_eq!(p.mean, 10.0);
            assert_eq!(p.std, 0.0);
            assert_eq!(p.upper, 10.0);
            assert_eq!(p.lower, 10.0);
        }
        assert!(excursions(&band).is_empty());
    }

    #[test]
    fn test_constant_band_collapses_for_inexact_values() {
        for value in [0.1, 0.7, 1.1] {
            let band = rolling_band(&[value; 6], 3, DEFAULT_BAND_K).unwrap();
            for p in &band {
                assert_eq!(p.std, 0.0);
                assert_eq!(p.upper, p.lower);
            }
            assert!(excursions(&band).is_empty());
        }
    }

    #[test]
    fn test_min_periods_one() {
        let band = rolling_band(&[1.0, 3.0, 5.0, 7.0], 2, DEFAULT_BAND_K).unwrap();
        assert_eq!(band[0].mean, 1.0);
        assert_eq!(band[0].std, 0.0);
        assert_eq!(band[1].mean, 2.0);
        assert_eq!(band[3].mean, 6.0);
        assert!((band[3].std - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_excursion_detected() {
        let mut values = vec![5.0; 9];
        values.push(100.0);
        let band = rolling_band(&values, 10, DEFAULT_BAND_K).unwrap();
        assert_eq!(excursions(&band), vec![9]);
        assert!(band[9].upper < 100.0);
    }

    #[test]
    fn test_invalid_window() {
        assert!(rolling_band(&[1.0], 0, 2.0).is_err());
        assert!(rolling_band(&[], 3, 2.0).is_err());
        assert!(rolling_band(&[1.0, f64::INFINITY], 3, 2.0).is_err());
    }
}
