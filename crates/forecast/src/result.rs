//! Forecast output types.

use serde::{Deserialize, Serialize};

use crate::method::ForecastMethod;

/// Direction of the demand trend over the full series.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

/// Back-tested accuracy metrics.
///
/// MAPE is `None` (not an error) when any held-out actual is 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accuracy {
    pub mae: f64,
    pub rmse: f64,
    pub mape: Option<f64>,
}

/// Full forecast output for one item.
///
/// Invariant: `lower_bound[i] <= point_forecasts[i] <= upper_bound[i]` and
/// all three sequences have length equal to the requested horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Concrete method that produced the forecast (never `Auto`).
    pub method: ForecastMethod,
    pub point_forecasts: Vec<f64>,
    pub lower_bound: Vec<f64>,
    pub upper_bound: Vec<f64>,
    pub trend: Trend,
    pub seasonality_detected: bool,
    /// Seasonal period in effect (detected or configured), if any.
    pub seasonal_period: Option<usize>,
    /// Absent when the series leaves too little history to back-test.
    pub accuracy: Option<Accuracy>,
    pub confidence_level: f64,
}

/// Point forecasts plus interval bounds, as produced by a single method.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MethodForecast {
    pub(crate) points: Vec<f64>,
    pub(crate) lower: Vec<f64>,
    pub(crate) upper: Vec<f64>,
}
