//! Ordinary least squares on the period index, with prediction intervals.

use stocklens_core::stats;
use stocklens_core::{AnalyticsError, AnalyticsResult};

use crate::config::ForecastConfig;
use crate::result::MethodForecast;

pub(crate) const MIN_POINTS: usize = 3;

/// OLS fit of value against period index 0..n.
#[derive(Debug, Clone)]
pub(crate) struct OlsFit {
    pub(crate) slope: f64,
    pub(crate) intercept: f64,
    /// Root-mean-square of in-sample residuals.
    pub(crate) rmse: f64,
    pub(crate) x_mean: f64,
    /// Σ(x - x̄)², the denominator of the prediction-interval term.
    pub(crate) sxx: f64,
}

/// Fit requires at least 2 points (distinct x by construction).
pub(crate) fn fit(values: &[f64]) -> OlsFit {
    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = stats::mean(values);

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxx += dx * dx;
        sxy += dx * (y - y_mean);
    }

    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    let intercept = y_mean - slope * x_mean;

    let mut sse = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let r = y - (slope * i as f64 + intercept);
        sse += r * r;
    }
    let rmse = (sse / values.len() as f64).sqrt();

    OlsFit {
        slope,
        intercept,
        rmse,
        x_mean,
        sxx,
    }
}

pub(crate) fn forecast(
    values: &[f64],
    horizon: usize,
    cfg: &ForecastConfig,
) -> AnalyticsResult<MethodForecast> {
    let n = values.len();
    if n < MIN_POINTS {
        return Err(AnalyticsError::insufficient_data(format!(
            "linear regression needs at least {MIN_POINTS} points, have {n}"
        )));
    }

    let ols = fit(values);
    let z = stats::z_score(cfg.confidence_level)?;

    let mut points = Vec::with_capacity(horizon);
    let mut lower = Vec::with_capacity(horizon);
    let mut upper = Vec::with_capacity(horizon);
    for i in 0..horizon {
        let x_star = (n + i) as f64;
        let point = ols.slope * x_star + ols.intercept;
        // Standard prediction interval: widens with distance from the
        // fitted data's centroid.
        let centroid_term = (x_star - ols.x_mean).powi(2) / ols.sxx;
        let se = ols.rmse * (1.0 + 1.0 / n as f64 + centroid_term).sqrt();
        points.push(point);
        lower.push(point - z * se);
        upper.push(point + z * se);
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
    fn exact_line_is_recovered() {
        let values = vec![100.0, 90.0, 80.0, 70.0, 60.0, 50.0];
        let ols = fit(&values);
        assert!((ols.slope - (-10.0)).abs() < 1e-9);
        assert!((ols.intercept - 100.0).abs() < 1e-9);
        assert!(ols.rmse < 1e-9);
    }

    #[test]
    fn projection_continues_the_decline() {
        let values = vec![100.0, 90.0, 80.0, 70.0, 60.0, 50.0];
        let mf = forecast(&values, 3, &ForecastConfig::default()).unwrap();
        assert!((mf.points[0] - 40.0).abs() < 1e-9);
        assert!((mf.points[1] - 30.0).abs() < 1e-9);
        assert!((mf.points[2] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn constant_series_projects_the_constant() {
        let values = vec![4.0; 5];
        let mf = forecast(&values, 2, &ForecastConfig::default()).unwrap();
        assert_eq!(mf.points, vec![4.0, 4.0]);
        assert_eq!(mf.lower, vec![4.0, 4.0]);
        assert_eq!(mf.upper, vec![4.0, 4.0]);
    }

    #[test]
    fn interval_widens_away_from_the_centroid() {
        let values = vec![10.0, 12.0, 9.0, 14.0, 11.0, 13.0, 10.0, 12.0];
        let mf = forecast(&values, 4, &ForecastConfig::default()).unwrap();
        let w0 = mf.upper[0] - mf.lower[0];
        let w3 = mf.upper[3] - mf.lower[3];
        assert!(w3 > w0);
    }

    #[test]
    fn too_short_series_is_insufficient() {
        let err = forecast(&[1.0, 2.0], 1, &ForecastConfig::default()).unwrap_err();
        assert!(matches!(err, AnalyticsError::InsufficientData(_)));
    }
}
