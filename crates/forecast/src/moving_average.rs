//! Moving-average method: mean of the last `k` periods, projected flat.

use stocklens_core::stats;
use stocklens_core::{AnalyticsError, AnalyticsResult};

use crate::config::ForecastConfig;
use crate::result::MethodForecast;

pub(crate) const MIN_POINTS: usize = 2;

/// Window size for a series of length `n`: configured value, or
/// `min(7, n/2)` clamped to at least 2.
pub(crate) fn window_size(n: usize, cfg: &ForecastConfig) -> usize {
    cfg.moving_average_window
        .unwrap_or_else(|| (n / 2).min(7).max(2))
}

pub(crate) fn forecast(
    values: &[f64],
    horizon: usize,
    cfg: &ForecastConfig,
) -> AnalyticsResult<MethodForecast> {
    let n = values.len();
    if n < MIN_POINTS {
        return Err(AnalyticsError::insufficient_data(format!(
            "moving average needs at least {MIN_POINTS} points, have {n}"
        )));
    }
    let window = window_size(n, cfg);
    if window > n {
        return Err(AnalyticsError::insufficient_data(format!(
            "moving average window {window} exceeds series length {n}"
        )));
    }

    let tail = &values[n - window..];
    let point = stats::mean(tail);
    let spread = stats::z_score(cfg.confidence_level)? * stats::sample_std_dev(tail);

    Ok(MethodForecast {
        points: vec![point; horizon],
        lower: vec![point - spread; horizon],
        upper: vec![point + spread; horizon],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_series_projects_the_constant() {
        let values = vec![10.0; 6];
        let mf = forecast(&values, 3, &ForecastConfig::default()).unwrap();
        assert_eq!(mf.points, vec![10.0; 3]);
        assert_eq!(mf.lower, vec![10.0; 3]);
        assert_eq!(mf.upper, vec![10.0; 3]);
    }

    #[test]
    fn window_defaults_to_half_length_capped_at_seven() {
        let cfg = ForecastConfig::default();
        assert_eq!(window_size(6, &cfg), 3);
        assert_eq!(window_size(30, &cfg), 7);
        assert_eq!(window_size(4, &cfg), 2);
        assert_eq!(window_size(3, &cfg), 2);
    }

    #[test]
    fn configured_window_drives_the_mean() {
        let values = vec![1.0, 1.0, 1.0, 4.0, 6.0];
        let cfg = ForecastConfig::default().with_moving_average_window(2);
        let mf = forecast(&values, 1, &cfg).unwrap();
        assert!((mf.points[0] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn interval_brackets_the_point() {
        let values = vec![8.0, 12.0, 9.0, 11.0, 10.0, 10.0];
        let mf = forecast(&values, 4, &ForecastConfig::default()).unwrap();
        for i in 0..4 {
            assert!(mf.lower[i] <= mf.points[i]);
            assert!(mf.points[i] <= mf.upper[i]);
        }
    }

    #[test]
    fn too_short_series_is_insufficient() {
        let err = forecast(&[5.0], 1, &ForecastConfig::default()).unwrap_err();
        assert!(matches!(err, AnalyticsError::InsufficientData(_)));
    }

    #[test]
    fn oversized_configured_window_is_insufficient() {
        let cfg = ForecastConfig::default().with_moving_average_window(10);
        let err = forecast(&[1.0, 2.0, 3.0], 1, &cfg).unwrap_err();
        assert!(matches!(err, AnalyticsError::InsufficientData(_)));
    }
}
