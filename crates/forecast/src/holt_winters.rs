//! Additive Holt-Winters: level, trend, and seasonal recursions.

use stocklens_core::stats;
use stocklens_core::{AnalyticsError, AnalyticsResult};

use crate::config::ForecastConfig;
use crate::result::MethodForecast;

const LEVEL_ALPHA: f64 = 0.3;
const TREND_BETA: f64 = 0.1;
const SEASONAL_GAMMA: f64 = 0.1;

/// Forecast with a known seasonal period `m`. Requires at least two full
/// cycles of history.
pub(crate) fn forecast(
    values: &[f64],
    horizon: usize,
    period: usize,
    cfg: &ForecastConfig,
) -> AnalyticsResult<MethodForecast> {
    let n = values.len();
    if period < 2 {
        return Err(AnalyticsError::invalid_configuration(format!(
            "seasonal period {period} must be at least 2"
        )));
    }
    if n < 2 * period {
        return Err(AnalyticsError::insufficient_seasonal_data(format!(
            "holt-winters with seasonal period {period} needs {} points, have {n}",
            2 * period
        )));
    }

    // Initialization from the first two cycles.
    let first_cycle_mean = stats::mean(&values[..period]);
    let second_cycle_mean = stats::mean(&values[period..2 * period]);
    let mut level = first_cycle_mean;
    let mut trend = (second_cycle_mean - first_cycle_mean) / period as f64;
    let mut seasonals: Vec<f64> = values[..period].iter().map(|x| x - level).collect();

    let mut residuals = Vec::with_capacity(n - period);
    for t in period..n {
        let x = values[t];
        let seasonal = seasonals[t - period];
        let fitted = level + trend + seasonal;
        residuals.push(x - fitted);

        let prev_level = level;
        level = LEVEL_ALPHA * (x - seasonal) + (1.0 - LEVEL_ALPHA) * (level + trend);
        trend = TREND_BETA * (level - prev_level) + (1.0 - TREND_BETA) * trend;
        seasonals.push(SEASONAL_GAMMA * (x - level) + (1.0 - SEASONAL_GAMMA) * seasonal);
    }

    let std_error = stats::population_std_dev(&residuals);
    let z = stats::z_score(cfg.confidence_level)?;

    let mut points = Vec::with_capacity(horizon);
    let mut lower = Vec::with_capacity(horizon);
    let mut upper = Vec::with_capacity(horizon);
    for h in 0..horizon {
        let step = (h + 1) as f64;
        let seasonal = seasonals[n - period + (h % period)];
        let point = level + step * trend + seasonal;
        let spread = z * std_error * (1.0 + h as f64 * 0.2).sqrt();
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
