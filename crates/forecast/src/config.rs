//! Forecasting configuration.

use serde::{Deserialize, Serialize};
use stocklens_core::{AnalyticsError, AnalyticsResult};

/// Tunable parameters for the forecasting engine.
///
/// Every knob has a documented default; overriding one changes parameters
/// only, never the algorithmic contract. Configuration is passed per call,
/// so concurrent callers with different settings never interfere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Moving-average window; default derived from series length
    /// (`min(7, n/2)`, at least 2).
    pub moving_average_window: Option<usize>,
    /// Smoothing factor α for exponential smoothing; default chosen by a
    /// coarse grid search over 0.1..=0.9.
    pub smoothing_alpha: Option<f64>,
    /// Seasonal period override; default detected via autocorrelation.
    pub seasonal_period: Option<usize>,
    /// Two-sided confidence level for prediction intervals.
    pub confidence_level: f64,
    /// Trailing periods withheld for back-testing; default `max(2, n/5)`.
    pub backtest_holdout: Option<usize>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            moving_average_window: None,
            smoothing_alpha: None,
            seasonal_period: None,
            confidence_level: 0.95,
            backtest_holdout: None,
        }
    }
}

impl ForecastConfig {
    pub fn with_moving_average_window(mut self, window: usize) -> Self {
        self.moving_average_window = Some(window);
        self
    }

    pub fn with_smoothing_alpha(mut self, alpha: f64) -> Self {
        self.smoothing_alpha = Some(alpha);
        self
    }

    pub fn with_seasonal_period(mut self, period: usize) -> Self {
        self.seasonal_period = Some(period);
        self
    }

    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    pub fn with_backtest_holdout(mut self, holdout: usize) -> Self {
        self.backtest_holdout = Some(holdout);
        self
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        if let Some(window) = self.moving_average_window {
            if window < 2 {
                return Err(AnalyticsError::invalid_configuration(format!(
                    "moving average window {window} must be at least 2"
                )));
            }
        }
        if let Some(alpha) = self.smoothing_alpha {
            if !(alpha > 0.0 && alpha < 1.0) {
                return Err(AnalyticsError::invalid_configuration(format!(
                    "smoothing alpha {alpha} must be in (0, 1)"
                )));
            }
        }
        if let Some(period) = self.seasonal_period {
            if period < 2 {
                return Err(AnalyticsError::invalid_configuration(format!(
                    "seasonal period {period} must be at least 2"
                )));
            }
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(AnalyticsError::invalid_configuration(format!(
                "confidence level {} must be in (0, 1)",
                self.confidence_level
            )));
        }
        if let Some(holdout) = self.backtest_holdout {
            if holdout < 1 {
                return Err(AnalyticsError::invalid_configuration(
                    "backtest holdout must be at least 1",
                ));
            }
        }
        Ok(())
    }
}
