//! Descriptive statistics shared by the scoring and detection modules.

use crate::types::{EngineError, Result};

/// Arithmetic mean. Empty or non-finite input is invalid.
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(EngineError::invalid("mean of empty series"));
    }
    check_finite(values)?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
///
/// A series with fewer than two points, or with every point equal, has a
/// deviation of exactly 0.
pub fn sample_std(values: &[f64]) -> Result<f64> {
    let m = mean(values)?;
    if values.len() < 2 || values.iter().all(|v| *v == values[0]) {
        return Ok(0.0);
    }
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Ok(var.sqrt())
}

pub(crate) fn check_finite(values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(EngineError::invalid(format!(
            "non-numeric value at position {}",
            i
        ))),
        None => Ok(()),
    }
}

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&v).unwrap(), 5.0);
        let std = sample_std(&v).unwrap();
        assert!((std - 2.138089935).abs() < 1e-6);
    }

    #[test]
    fn test_empty_is_invalid() {
        assert!(mean(&[]).is_err());
        assert!(sample_std(&[]).is_err());
    }

    #[test]
    fn test_single_point_std() {
        assert_eq!(sample_std(&[3.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_constant_series_std_is_exactly_zero() {
        for value in [0.1, 0.7, 1.1, 4.2, 3.86, -2.3] {
            for len in [2, 3, 6, 10, 20, 48] {
                let series = vec![value; len];
                assert_eq!(sample_std(&series).unwrap(), 0.0, "{} x {}", value, len);
            }
        }
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(97.25, 1), 97.3);
        assert_eq!(round_to(-1.25, 1), -1.3);
    }
}
