//! Single-parameter exponential smoothing with grid-searched α.

use stocklens_core::stats;
use stocklens_core::{AnalyticsError, AnalyticsResult};

use crate::config::ForecastConfig;
use crate::result::MethodForecast;

pub(crate) const MIN_POINTS: usize = 2;

/// α candidates for the coarse grid search: 0.1..=0.9 step 0.1.
const ALPHA_GRID: [f64; 9] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];

/// Recursive level series: `L_0 = x_0`, `L_t = α·x_t + (1-α)·L_{t-1}`.
fn smooth(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut levels = Vec::with_capacity(values.len());
    let mut level = values[0];
    levels.push(level);
    for &x in &values[1..] {
        level = alpha * x + (1.0 - alpha) * level;
        levels.push(level);
    }
    levels
}

/// In-sample one-step-ahead squared error for a fixed α.
fn one_step_sse(values: &[f64], alpha: f64) -> f64 {
    let mut level = values[0];
    let mut sse = 0.0;
    for &x in &values[1..] {
        let err = x - level;
        sse += err * err;
        level = alpha * x + (1.0 - alpha) * level;
    }
    sse
}

/// Configured α, or the grid value minimizing in-sample squared error
/// (ties keep the smaller α).
pub(crate) fn choose_alpha(values: &[f64], cfg: &ForecastConfig) -> f64 {
    if let Some(alpha) = cfg.smoothing_alpha {
        return alpha;
    }
    let mut best = ALPHA_GRID[0];
    let mut best_sse = one_step_sse(values, best);
    for &alpha in &ALPHA_GRID[1..] {
        let sse = one_step_sse(values, alpha);
        if sse < best_sse {
            best = alpha;
            best_sse = sse;
        }
    }
    best
}

pub(crate) fn forecast(
    values: &[f64],
    horizon: usize,
    cfg: &ForecastConfig,
) -> AnalyticsResult<MethodForecast> {
    let n = values.len();
    if n < MIN_POINTS {
        return Err(AnalyticsError::insufficient_data(format!(
            "exponential smoothing needs at least {MIN_POINTS} points, have {n}"
        )));
    }

    let alpha = choose_alpha(values, cfg);
    let levels = smooth(values, alpha);
    let point = levels[n - 1];

    let residuals: Vec<f64> = values
        .iter()
        .zip(&levels)
        .map(|(x, level)| x - level)
        .collect();
    let std_error = stats::population_std_dev(&residuals);
    let z = stats::z_score(cfg.confidence_level)?;

    let mut points = Vec::with_capacity(horizon);
    let mut lower = Vec::with_capacity(horizon);
    let mut upper = Vec::with_capacity(horizon);
    for i in 0..horizon {
        // Interval widens with horizon as smoothing error accumulates.
        let spread = z * std_error * (1.0 + i as f64 * alpha * alpha).sqrt();
        points.push(point);
        lower.push(point - spread);
        upper.push(point + spread);
    }

    Ok(MethodForecast {
        points,
        lower,
        upper,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_series_projects_the_constant() {
        let values = vec![7.5; 8];
        let mf = forecast(&values, 4, &ForecastConfig::default()).unwrap();
        assert_eq!(mf.points, vec![7.5; 4]);
        assert_eq!(mf.lower, vec![7.5; 4]);
        assert_eq!(mf.upper, vec![7.5; 4]);
    }

    #[test]
    fn grid_search_prefers_high_alpha_for_level_shift() {
        // A step change rewards fast adaptation, i.e. large α.
        let values = vec![1.0, 1.0, 1.0, 1.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0];
        let alpha = choose_alpha(&values, &ForecastConfig::default());
        assert!(alpha >= 0.8, "expected aggressive alpha, got {alpha}");
    }

    #[test]
    fn configured_alpha_bypasses_grid_search() {
        let values = vec![1.0, 2.0, 3.0, 4.0];
        let cfg = ForecastConfig::default().with_smoothing_alpha(0.42);
        assert_eq!(choose_alpha(&values, &cfg), 0.42);
    }

    #[test]
    fn smoothed_level_follows_recursion() {
        let levels = smooth(&[10.0, 20.0], 0.5);
        assert_eq!(levels, vec![10.0, 15.0]);
    }

    #[test]
    fn interval_widens_with_horizon() {
        let values = vec![10.0, 14.0, 9.0, 13.0, 11.0, 12.0];
        let mf = forecast(&values, 3, &ForecastConfig::default()).unwrap();
        let w0 = mf.upper[0] - mf.lower[0];
        let w2 = mf.upper[2] - mf.lower[2];
        assert!(w2 > w0);
        for i in 0..3 {
            assert!(mf.lower[i] <= mf.points[i] && mf.points[i] <= mf.upper[i]);
        }
    }

    #[test]
    fn too_short_series_is_insufficient() {
        let err = forecast(&[1.0], 2, &ForecastConfig::default()).unwrap_err();
        assert!(matches!(err, AnalyticsError::InsufficientData(_)));
    }
}
