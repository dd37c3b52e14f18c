//! Forecast dispatch, back-testing, and automatic method selection.

use stocklens_core::{AnalyticsError, AnalyticsResult, TimeSeries};

use crate::config::ForecastConfig;
use crate::diagnostics;
use crate::method::ForecastMethod;
use crate::result::{Accuracy, ForecastResult, MethodForecast};
use crate::{holt_winters, moving_average, regression, smoothing};

/// Forecast `horizon` periods ahead of `series`.
///
/// `ForecastMethod::Auto` back-tests every applicable method on held-out
/// trailing periods and uses the one with the lowest MAE; ties prefer the
/// simpler method. A method whose minimum history requirement is unmet is
/// excluded from the candidate set; an empty set fails with
/// `InsufficientData`.
pub fn forecast(
    series: &TimeSeries,
    horizon: usize,
    method: ForecastMethod,
    cfg: &ForecastConfig,
) -> AnalyticsResult<ForecastResult> {
    cfg.validate()?;
    if horizon == 0 {
        return Err(AnalyticsError::invalid_configuration(
            "forecast horizon must be at least 1",
        ));
    }

    let values = series.values();
    let n = values.len();
    if n < 2 {
        return Err(AnalyticsError::insufficient_data(format!(
            "series has {n} point(s); at least 2 required to forecast"
        )));
    }

    let detected = diagnostics::detect_seasonal_period(values, series.period_length());
    let seasonal_period = cfg.seasonal_period.or(detected);
    let trend = diagnostics::detect_trend(values);

    let (resolved, accuracy) = match method {
        ForecastMethod::Auto => {
            let (chosen, acc) = select(values, seasonal_period, cfg)?;
            (chosen, Some(acc))
        }
        concrete => {
            let acc = backtest(values, concrete, seasonal_period, cfg).ok();
            (concrete, acc)
        }
    };

    let produced = run_method(values, horizon, resolved, seasonal_period, cfg)?;
    tracing::debug!(
        method = %resolved,
        horizon,
        series_len = n,
        seasonal_period,
        "forecast produced"
    );

    Ok(ForecastResult {
        method: resolved,
        point_forecasts: produced.points,
        lower_bound: produced.lower,
        upper_bound: produced.upper,
        trend,
        seasonality_detected: detected.is_some(),
        seasonal_period,
        accuracy,
        confidence_level: cfg.confidence_level,
    })
}

fn run_method(
    values: &[f64],
    horizon: usize,
    method: ForecastMethod,
    seasonal_period: Option<usize>,
    cfg: &ForecastConfig,
) -> AnalyticsResult<MethodForecast> {
    match method {
        ForecastMethod::MovingAverage => moving_average::forecast(values, horizon, cfg),
        ForecastMethod::ExponentialSmoothing => smoothing::forecast(values, horizon, cfg),
        ForecastMethod::LinearRegression => regression::forecast(values, horizon, cfg),
        ForecastMethod::HoltWinters => {
            let period = seasonal_period.ok_or_else(|| {
                AnalyticsError::insufficient_seasonal_data(
                    "no seasonal period detected or configured",
                )
            })?;
            holt_winters::forecast(values, horizon, period, cfg)
        }
        ForecastMethod::Auto => Err(AnalyticsError::invalid_configuration(
            "auto must be resolved before dispatch",
        )),
    }
}

/// Trailing periods withheld when back-testing a series of length `n`.
fn holdout_size(n: usize, cfg: &ForecastConfig) -> usize {
    cfg.backtest_holdout.unwrap_or_else(|| (n / 5).max(2))
}

/// Rolling-origin back-test: fit on the head, forecast the withheld tail,
/// and score the errors.
fn backtest(
    values: &[f64],
    method: ForecastMethod,
    seasonal_period: Option<usize>,
    cfg: &ForecastConfig,
) -> AnalyticsResult<Accuracy> {
    let n = values.len();
    let holdout = holdout_size(n, cfg);
    if holdout >= n {
        return Err(AnalyticsError::insufficient_data(format!(
            "cannot withhold {holdout} of {n} points for back-testing"
        )));
    }

    let (train, actuals) = values.split_at(n - holdout);
    let predicted = run_method(train, holdout, method, seasonal_period, cfg)?;

    let errors: Vec<f64> = actuals
        .iter()
        .zip(&predicted.points)
        .map(|(actual, point)| actual - point)
        .collect();
    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / holdout as f64;
    let rmse = (errors.iter().map(|e| e * e).sum::<f64>() / holdout as f64).sqrt();
    let mape = if actuals.iter().any(|a| *a == 0.0) {
        None
    } else {
        Some(
            errors
                .iter()
                .zip(actuals)
                .map(|(e, a)| (e / a).abs())
                .sum::<f64>()
                / holdout as f64
                * 100.0,
        )
    };

    Ok(Accuracy { mae, rmse, mape })
}

/// Pick the candidate with the lowest back-test MAE. Candidates are probed
/// in simplicity order and only a strictly lower error displaces the
/// incumbent, so ties go to the simpler method.
fn select(
    values: &[f64],
    seasonal_period: Option<usize>,
    cfg: &ForecastConfig,
) -> AnalyticsResult<(ForecastMethod, Accuracy)> {
    let mut best: Option<(ForecastMethod, Accuracy)> = None;
    for candidate in ForecastMethod::CANDIDATES {
        match backtest(values, candidate, seasonal_period, cfg) {
            Ok(accuracy) => {
                let improves = best
                    .as_ref()
                    .is_none_or(|(_, incumbent)| accuracy.mae < incumbent.mae);
                if improves {
                    best = Some((candidate, accuracy));
                }
            }
            Err(err) => {
                tracing::debug!(method = %candidate, %err, "excluded from auto-selection");
            }
        }
    }
    best.ok_or_else(|| {
        AnalyticsError::insufficient_data(format!(
            "no forecasting method applicable to a series of {} point(s)",
            values.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stocklens_core::PeriodLength;

    use crate::result::Trend;

    fn daily_series(values: Vec<f64>) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        TimeSeries::new(start, PeriodLength::Daily, values).unwrap()
    }

    #[test]
    fn constant_series_auto_selects_moving_average_with_zero_error() {
        let series = daily_series(vec![10.0; 6]);
        let result = forecast(&series, 3, ForecastMethod::Auto, &ForecastConfig::default())
            .unwrap();

        assert_eq!(result.method, ForecastMethod::MovingAverage);
        assert_eq!(result.point_forecasts, vec![10.0, 10.0, 10.0]);
        let accuracy = result.accuracy.unwrap();
        assert_eq!(accuracy.mae, 0.0);
        assert_eq!(accuracy.rmse, 0.0);
        assert_eq!(accuracy.mape, Some(0.0));
    }

    #[test]
    fn linear_decline_regression_continues_the_slope() {
        let series = daily_series(vec![100.0, 90.0, 80.0, 70.0, 60.0, 50.0]);
        let result = forecast(
            &series,
            2,
            ForecastMethod::LinearRegression,
            &ForecastConfig::default(),
        )
        .unwrap();

        assert_eq!(result.trend, Trend::Decreasing);
        assert!((result.point_forecasts[0] - 40.0).abs() < 1e-9);
        assert!((result.point_forecasts[1] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn single_point_series_fails_every_method() {
        let series = daily_series(vec![42.0]);
        for method in [
            ForecastMethod::MovingAverage,
            ForecastMethod::ExponentialSmoothing,
            ForecastMethod::LinearRegression,
            ForecastMethod::HoltWinters,
            ForecastMethod::Auto,
        ] {
            let err = forecast(&series, 3, method, &ForecastConfig::default()).unwrap_err();
            assert!(
                matches!(err, AnalyticsError::InsufficientData(_)),
                "{method} returned {err:?}"
            );
        }
    }

    #[test]
    fn zero_horizon_is_invalid_configuration() {
        let series = daily_series(vec![1.0, 2.0, 3.0]);
        let err = forecast(&series, 0, ForecastMethod::MovingAverage, &ForecastConfig::default())
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidConfiguration(_)));
    }

    #[test]
    fn holt_winters_without_seasonality_reports_seasonal_error() {
        let series = daily_series(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let err = forecast(&series, 2, ForecastMethod::HoltWinters, &ForecastConfig::default())
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::InsufficientSeasonalData(_)));
    }

    #[test]
    fn seasonal_override_enables_holt_winters() {
        let pattern = [10.0, 20.0, 30.0, 20.0];
        let values: Vec<f64> = (0..3).flat_map(|_| pattern).collect();
        let series = daily_series(values);
        let cfg = ForecastConfig::default().with_seasonal_period(4);

        let result = forecast(&series, 4, ForecastMethod::HoltWinters, &cfg).unwrap();
        assert_eq!(result.method, ForecastMethod::HoltWinters);
        assert_eq!(result.seasonal_period, Some(4));
        // Nothing was detected at the daily candidate lag of 7.
        assert!(!result.seasonality_detected);
    }

    #[test]
    fn bounds_bracket_points_for_every_method() {
        let values = vec![12.0, 9.0, 14.0, 11.0, 13.0, 8.0, 15.0, 10.0, 12.0, 11.0];
        let series = daily_series(values);
        for method in [
            ForecastMethod::MovingAverage,
            ForecastMethod::ExponentialSmoothing,
            ForecastMethod::LinearRegression,
        ] {
            let result = forecast(&series, 5, method, &ForecastConfig::default()).unwrap();
            for i in 0..5 {
                assert!(
                    result.lower_bound[i] <= result.point_forecasts[i]
                        && result.point_forecasts[i] <= result.upper_bound[i],
                    "interval violated by {method} at step {i}"
                );
            }
        }
    }

    #[test]
    fn accuracy_is_absent_when_history_cannot_be_withheld() {
        let series = daily_series(vec![5.0, 6.0]);
        let result = forecast(&series, 1, ForecastMethod::MovingAverage, &ForecastConfig::default())
            .unwrap();
        assert!(result.accuracy.is_none());
    }

    #[test]
    fn mape_is_null_when_actuals_contain_zero() {
        let series = daily_series(vec![4.0, 5.0, 6.0, 5.0, 4.0, 5.0, 6.0, 5.0, 0.0, 5.0]);
        let result = forecast(&series, 1, ForecastMethod::MovingAverage, &ForecastConfig::default())
            .unwrap();
        let accuracy = result.accuracy.unwrap();
        assert!(accuracy.mape.is_none());
        assert!(accuracy.mae >= 0.0);
    }

    #[test]
    fn auto_selection_is_deterministic() {
        let values = vec![20.0, 22.0, 19.0, 25.0, 21.0, 24.0, 20.0, 23.0, 22.0, 21.0];
        let series = daily_series(values);
        let first = forecast(&series, 3, ForecastMethod::Auto, &ForecastConfig::default())
            .unwrap();
        let second = forecast(&series, 3, ForecastMethod::Auto, &ForecastConfig::default())
            .unwrap();
        assert_eq!(first, second);
    }
}
