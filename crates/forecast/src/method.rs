//! The closed set of forecasting methods.

use serde::{Deserialize, Serialize};

/// Forecasting method.
///
/// `Auto` resolves to one of the concrete variants by back-testing; a
/// [`ForecastResult`](crate::ForecastResult) always carries the concrete
/// method that produced it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    MovingAverage,
    ExponentialSmoothing,
    LinearRegression,
    HoltWinters,
    Auto,
}

impl ForecastMethod {
    /// Concrete candidates in simplicity order; auto-selection ties are
    /// broken in favor of the earlier entry.
    pub const CANDIDATES: [ForecastMethod; 4] = [
        ForecastMethod::MovingAverage,
        ForecastMethod::ExponentialSmoothing,
        ForecastMethod::LinearRegression,
        ForecastMethod::HoltWinters,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMethod::MovingAverage => "moving_average",
            ForecastMethod::ExponentialSmoothing => "exponential_smoothing",
            ForecastMethod::LinearRegression => "linear_regression",
            ForecastMethod::HoltWinters => "holt_winters",
            ForecastMethod::Auto => "auto",
        }
    }
}

impl core::fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
