//! Stock status classification and reorder suggestions.

use serde::{Deserialize, Serialize};

use stocklens_core::{AnalyticsError, AnalyticsResult};

/// Stock status relative to the reorder rule.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    Critical,
    Low,
    Normal,
    Overstock,
}

/// Min/max reorder rule for one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReorderRule {
    pub min_qty: f64,
    pub max_qty: f64,
}

impl ReorderRule {
    pub fn new(min_qty: f64, max_qty: f64) -> Self {
        Self { min_qty, max_qty }
    }

    fn validate(&self) -> AnalyticsResult<()> {
        if !(self.min_qty >= 0.0 && self.max_qty >= 0.0 && self.min_qty <= self.max_qty) {
            return Err(AnalyticsError::invalid_configuration(format!(
                "reorder rule (min {}, max {}) must satisfy 0 <= min <= max",
                self.min_qty, self.max_qty
            )));
        }
        Ok(())
    }
}

/// Current stock position for one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockPosition {
    pub on_hand: f64,
    /// Confirmed inbound quantity not yet received.
    pub incoming: f64,
    /// Reserved/committed outbound quantity not yet shipped.
    pub outgoing: f64,
}

impl StockPosition {
    pub fn new(on_hand: f64, incoming: f64, outgoing: f64) -> Self {
        Self {
            on_hand,
            incoming,
            outgoing,
        }
    }

    /// Projected quantity once confirmed moves complete.
    pub fn forecast(&self) -> f64 {
        self.on_hand + self.incoming - self.outgoing
    }
}

/// Stock-level analysis output for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLevelReport {
    pub status: StockStatus,
    /// On-hand plus incoming minus outgoing.
    pub forecast_qty: f64,
    /// `None` without a positive consumption rate.
    pub days_of_stock: Option<f64>,
    /// Quantity to order to restore the rule maximum; 0 when no order is
    /// needed or no rule is configured.
    pub suggested_reorder_qty: f64,
}

/// Grade a stock position against its reorder rule and daily consumption.
///
/// Status thresholds: forecast at or below zero (or under half the rule
/// minimum) is critical, under the minimum is low, more than 1.5× the rule
/// maximum on hand is overstock.
pub fn analyze_stock_level(
    position: StockPosition,
    rule: Option<ReorderRule>,
    avg_daily_consumption: Option<f64>,
) -> AnalyticsResult<StockLevelReport> {
    if !(position.on_hand.is_finite() && position.on_hand >= 0.0) {
        return Err(AnalyticsError::malformed_series(format!(
            "on-hand quantity {} must be non-negative",
            position.on_hand
        )));
    }
    if !(position.incoming.is_finite()
        && position.incoming >= 0.0
        && position.outgoing.is_finite()
        && position.outgoing >= 0.0)
    {
        return Err(AnalyticsError::malformed_series(
            "incoming/outgoing quantities must be non-negative",
        ));
    }
    if let Some(rule) = &rule {
        rule.validate()?;
    }
    if let Some(rate) = avg_daily_consumption {
        if !(rate.is_finite() && rate >= 0.0) {
            return Err(AnalyticsError::malformed_series(format!(
                "average daily consumption {rate} must be non-negative"
            )));
        }
    }

    let forecast_qty = position.forecast();
    let status = classify(position.on_hand, forecast_qty, rule);

    let days_of_stock = avg_daily_consumption
        .filter(|rate| *rate > 0.0)
        .map(|rate| position.on_hand / rate);

    let suggested_reorder_qty = match rule {
        Some(rule) if forecast_qty < rule.min_qty && rule.max_qty > 0.0 => {
            rule.max_qty - forecast_qty
        }
        _ => 0.0,
    };

    Ok(StockLevelReport {
        status,
        forecast_qty,
        days_of_stock,
        suggested_reorder_qty,
    })
}

fn classify(on_hand: f64, forecast_qty: f64, rule: Option<ReorderRule>) -> StockStatus {
    if on_hand <= 0.0 {
        return StockStatus::OutOfStock;
    }
    let Some(rule) = rule else {
        return StockStatus::Normal;
    };
    if rule.min_qty > 0.0 {
        if forecast_qty <= 0.0 || forecast_qty < rule.min_qty * 0.5 {
            return StockStatus::Critical;
        }
        if forecast_qty < rule.min_qty {
            return StockStatus::Low;
        }
    }
    if rule.max_qty > 0.0 && on_hand > rule.max_qty * 1.5 {
        return StockStatus::Overstock;
    }
    StockStatus::Normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_shelf_is_out_of_stock() {
        let report = analyze_stock_level(StockPosition::new(0.0, 10.0, 0.0), None, None).unwrap();
        assert_eq!(report.status, StockStatus::OutOfStock);
    }

    #[test]
    fn forecast_below_half_minimum_is_critical() {
        let rule = ReorderRule::new(20.0, 100.0);
        let report =
            analyze_stock_level(StockPosition::new(15.0, 0.0, 7.0), Some(rule), None).unwrap();
        assert_eq!(report.forecast_qty, 8.0);
        assert_eq!(report.status, StockStatus::Critical);
    }

    #[test]
    fn forecast_under_minimum_is_low_and_suggests_a_reorder() {
        let rule = ReorderRule::new(20.0, 100.0);
        let report =
            analyze_stock_level(StockPosition::new(18.0, 0.0, 0.0), Some(rule), None).unwrap();
        assert_eq!(report.status, StockStatus::Low);
        assert_eq!(report.suggested_reorder_qty, 82.0);
    }

    #[test]
    fn well_stocked_item_is_normal_with_no_suggestion() {
        let rule = ReorderRule::new(20.0, 100.0);
        let report =
            analyze_stock_level(StockPosition::new(60.0, 0.0, 0.0), Some(rule), None).unwrap();
        assert_eq!(report.status, StockStatus::Normal);
        assert_eq!(report.suggested_reorder_qty, 0.0);
    }

    #[test]
    fn far_above_maximum_is_overstock() {
        let rule = ReorderRule::new(20.0, 100.0);
        let report =
            analyze_stock_level(StockPosition::new(200.0, 0.0, 0.0), Some(rule), None).unwrap();
        assert_eq!(report.status, StockStatus::Overstock);
    }

    #[test]
    fn days_of_stock_comes_from_consumption_rate() {
        let report =
            analyze_stock_level(StockPosition::new(90.0, 0.0, 0.0), None, Some(4.5)).unwrap();
        assert_eq!(report.days_of_stock, Some(20.0));

        let idle = analyze_stock_level(StockPosition::new(90.0, 0.0, 0.0), None, Some(0.0)).unwrap();
        assert_eq!(idle.days_of_stock, None);
    }

    #[test]
    fn negative_position_is_malformed() {
        let err = analyze_stock_level(StockPosition::new(-1.0, 0.0, 0.0), None, None).unwrap_err();
        assert!(matches!(err, AnalyticsError::MalformedSeries(_)));
    }

    #[test]
    fn inverted_rule_is_invalid() {
        let rule = ReorderRule::new(50.0, 10.0);
        let err =
            analyze_stock_level(StockPosition::new(5.0, 0.0, 0.0), Some(rule), None).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidConfiguration(_)));
    }
}
