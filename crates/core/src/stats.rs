//! Shared statistical helpers.

use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;

use crate::error::{AnalyticsError, AnalyticsResult};

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().mean()
}

/// Sample standard deviation (n-1); 0 for fewer than 2 points.
pub fn sample_std_dev(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    xs.iter().std_dev()
}

/// Population standard deviation (n); 0 for an empty slice.
pub fn population_std_dev(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().population_std_dev()
}

/// Two-sided standard-normal quantile for a confidence level, e.g.
/// 0.95 → ≈1.96.
pub fn z_score(confidence_level: f64) -> AnalyticsResult<f64> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(AnalyticsError::invalid_configuration(format!(
            "confidence level {confidence_level} must be in (0, 1)"
        )));
    }
    let standard_normal = Normal::new(0.0, 1.0)
        .map_err(|e| AnalyticsError::invalid_configuration(e.to_string()))?;
    Ok(standard_normal.inverse_cdf((1.0 + confidence_level) / 2.0))
}
