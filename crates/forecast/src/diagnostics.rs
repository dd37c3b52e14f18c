//! Trend and seasonality diagnostics.

use stocklens_core::stats;
use stocklens_core::PeriodLength;

use crate::regression;
use crate::result::Trend;

/// Relative slope (slope / |mean|) beyond which a trend is called.
const TREND_THRESHOLD: f64 = 0.05;

/// Autocorrelation a candidate lag must exceed to qualify as seasonal.
const SEASONALITY_THRESHOLD: f64 = 0.3;

/// Seasonal lags worth probing for a given period width.
fn candidate_lags(period_length: PeriodLength) -> &'static [usize] {
    match period_length {
        PeriodLength::Daily => &[7],
        PeriodLength::Weekly => &[4, 52],
        PeriodLength::Monthly => &[12],
    }
}

/// Classify the demand trend from the OLS slope over the full series.
pub fn detect_trend(values: &[f64]) -> Trend {
    if values.len() < 3 {
        return Trend::Stable;
    }
    let slope = regression::fit(values).slope;
    let mean = stats::mean(values);
    let relative = slope / mean.abs().max(f64::EPSILON);
    if relative > TREND_THRESHOLD {
        Trend::Increasing
    } else if relative < -TREND_THRESHOLD {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

/// Lag-`k` autocorrelation of the mean-centered series, normalized by the
/// lag-0 term. 0 for degenerate (constant or too-short) input.
pub(crate) fn autocorrelation(values: &[f64], lag: usize) -> f64 {
    if lag == 0 || values.len() <= lag {
        return 0.0;
    }
    let mean = stats::mean(values);
    let centered: Vec<f64> = values.iter().map(|x| x - mean).collect();
    let denominator: f64 = centered.iter().map(|d| d * d).sum();
    if denominator <= f64::EPSILON {
        return 0.0;
    }
    let numerator: f64 = centered
        .iter()
        .zip(&centered[lag..])
        .map(|(a, b)| a * b)
        .sum();
    numerator / denominator
}

/// First candidate lag whose autocorrelation clears the significance
/// threshold, given at least two full cycles of history.
pub fn detect_seasonal_period(values: &[f64], period_length: PeriodLength) -> Option<usize> {
    candidate_lags(period_length)
        .iter()
        .copied()
        .find(|&lag| values.len() >= 2 * lag && autocorrelation(values, lag) > SEASONALITY_THRESHOLD)
}
