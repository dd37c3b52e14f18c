//! Turnover-ratio analysis.

use serde::{Deserialize, Serialize};

use stocklens_core::{AnalyticsError, AnalyticsResult, TimeSeries};

/// Movement-ratio classification.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnoverClass {
    FastMoving,
    Normal,
    SlowMoving,
    DeadStock,
}

impl TurnoverClass {
    /// Slow movers and dead stock both warrant obsolescence attention.
    pub fn is_slow_or_dead(&self) -> bool {
        matches!(self, TurnoverClass::SlowMoving | TurnoverClass::DeadStock)
    }
}

/// Annual-turns thresholds separating the classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnoverConfig {
    /// At or above: fast-moving.
    pub fast_threshold: f64,
    /// At or above: normal.
    pub normal_threshold: f64,
    /// At or above: slow-moving; below: dead stock.
    pub slow_threshold: f64,
}

impl Default for TurnoverConfig {
    fn default() -> Self {
        Self {
            fast_threshold: 12.0,
            normal_threshold: 4.0,
            slow_threshold: 1.0,
        }
    }
}

impl TurnoverConfig {
    pub fn with_thresholds(mut self, fast: f64, normal: f64, slow: f64) -> Self {
        self.fast_threshold = fast;
        self.normal_threshold = normal;
        self.slow_threshold = slow;
        self
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        if !(self.fast_threshold > self.normal_threshold
            && self.normal_threshold > self.slow_threshold
            && self.slow_threshold > 0.0)
        {
            return Err(AnalyticsError::invalid_configuration(format!(
                "turnover thresholds ({}, {}, {}) must be strictly decreasing and positive",
                self.fast_threshold, self.normal_threshold, self.slow_threshold
            )));
        }
        Ok(())
    }
}

/// Turnover analysis output for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoverResult {
    pub annualized_consumption: f64,
    pub average_on_hand: f64,
    /// Annual turns; 0 when nothing moved or nothing was held.
    pub ratio: f64,
    /// `f64::INFINITY` when the ratio is 0.
    pub days_of_inventory: f64,
    pub classification: TurnoverClass,
}

/// Analyze turnover for one item's consumption series against its average
/// on-hand quantity over the same window.
///
/// The series must be a consumption series (non-negative values); the sum
/// is annualized by the series' period length before dividing.
pub fn analyze_turnover(
    series: &TimeSeries,
    average_on_hand: f64,
    cfg: &TurnoverConfig,
) -> AnalyticsResult<TurnoverResult> {
    cfg.validate()?;
    if !(average_on_hand.is_finite() && average_on_hand >= 0.0) {
        return Err(AnalyticsError::malformed_series(format!(
            "average on-hand quantity {average_on_hand} must be non-negative"
        )));
    }
    if let Some(v) = series.values().iter().find(|v| **v < 0.0) {
        return Err(AnalyticsError::malformed_series(format!(
            "consumption series contains negative value {v}"
        )));
    }

    let periods_per_year = series.period_length().periods_per_year() as f64;
    let annualized_consumption = series.sum() * periods_per_year / series.len() as f64;

    let ratio = if average_on_hand > 0.0 {
        annualized_consumption / average_on_hand
    } else {
        0.0
    };
    let days_of_inventory = if ratio > 0.0 {
        365.0 / ratio
    } else {
        f64::INFINITY
    };

    let classification = if ratio >= cfg.fast_threshold {
        TurnoverClass::FastMoving
    } else if ratio >= cfg.normal_threshold {
        TurnoverClass::Normal
    } else if ratio >= cfg.slow_threshold {
        TurnoverClass::SlowMoving
    } else {
        TurnoverClass::DeadStock
    };

    Ok(TurnoverResult {
        annualized_consumption,
        average_on_hand,
        ratio,
        days_of_inventory,
        classification,
    })
}
