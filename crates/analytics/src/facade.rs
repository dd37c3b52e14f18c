//! Portfolio fan-out and per-item failure handling.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use stocklens_classification::{classify, ClassificationConfig, ClassificationResult, PortfolioEntry};
use stocklens_core::{AnalyticsError, AnalyticsResult, ErrorKind, ItemId, TimeSeries};
use stocklens_forecast::{forecast, ForecastConfig, ForecastMethod, ForecastResult};
use stocklens_stock::{analyze_stock_level, ReorderRule, StockLevelReport, StockPosition};
use stocklens_turnover::{
    analyze_aging, analyze_turnover, AgingConfig, AgingResult, StockLot, TurnoverConfig,
    TurnoverResult,
};

use crate::summary::{summarize, PortfolioSummary};

/// Per-engine configuration for one portfolio request.
///
/// Passed into each call rather than held as process state, so concurrent
/// requests with different settings never interfere.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub forecast: ForecastConfig,
    pub classification: ClassificationConfig,
    pub turnover: TurnoverConfig,
    pub aging: AgingConfig,
}

/// Everything the facade may analyze for one item. Optional inputs switch
/// their analyses on; an item with only a series and cost still gets
/// classified and forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInput {
    pub item_id: ItemId,
    /// Consumption series for the item.
    pub series: TimeSeries,
    pub unit_cost: f64,
    /// Average on-hand quantity over the series window; enables turnover.
    pub average_on_hand: Option<f64>,
    /// On-hand lots with receipt dates; enables aging.
    pub lots: Option<Vec<StockLot>>,
    /// Current stock position; enables stock-level analysis.
    pub position: Option<StockPosition>,
    pub reorder_rule: Option<ReorderRule>,
}

impl ItemInput {
    pub fn new(item_id: impl Into<ItemId>, series: TimeSeries, unit_cost: f64) -> Self {
        Self {
            item_id: item_id.into(),
            series,
            unit_cost,
            average_on_hand: None,
            lots: None,
            position: None,
            reorder_rule: None,
        }
    }

    pub fn with_average_on_hand(mut self, average_on_hand: f64) -> Self {
        self.average_on_hand = Some(average_on_hand);
        self
    }

    pub fn with_lots(mut self, lots: Vec<StockLot>) -> Self {
        self.lots = Some(lots);
        self
    }

    pub fn with_position(mut self, position: StockPosition) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_reorder_rule(mut self, rule: ReorderRule) -> Self {
        self.reorder_rule = Some(rule);
        self
    }
}

/// A captured analysis failure, tagged with its error kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<AnalyticsError> for Failure {
    fn from(err: AnalyticsError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// All analyses for one item. Sub-analyses fail independently; a failed
/// forecast does not discard the classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAnalytics {
    pub classification: ClassificationResult,
    pub forecast: Result<ForecastResult, Failure>,
    /// `None` when no average on-hand quantity was supplied.
    pub turnover: Option<Result<TurnoverResult, Failure>>,
    /// `None` when no lots were supplied.
    pub aging: Option<Result<AgingResult, Failure>>,
    /// `None` when no stock position was supplied.
    pub stock_level: Option<Result<StockLevelReport, Failure>>,
}

/// Outcome for one requested item: analyzed, or rejected at validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemOutcome {
    Analyzed(Box<ItemAnalytics>),
    Failed(Failure),
}

/// Full portfolio result: exactly one outcome per requested item, plus the
/// reduced summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub items: BTreeMap<ItemId, ItemOutcome>,
    pub summary: PortfolioSummary,
}

/// Analyze a portfolio: classify it as a whole, then fan the per-item
/// analyses out across a worker pool.
///
/// One item's bad input never aborts the batch; the item is reported as
/// `Failed` with its error kind and excluded from the value ranking.
/// Configuration errors, by contrast, affect every item and are raised.
pub fn analyze_portfolio(
    items: &[ItemInput],
    horizon: usize,
    as_of: NaiveDate,
    cfg: &AnalyticsConfig,
) -> AnalyticsResult<PortfolioReport> {
    cfg.forecast.validate()?;
    cfg.classification.validate()?;
    cfg.turnover.validate()?;
    cfg.aging.validate()?;

    tracing::info!(items = items.len(), horizon, %as_of, "analyzing portfolio");

    let mut outcomes: BTreeMap<ItemId, ItemOutcome> = BTreeMap::new();
    let mut valid: Vec<&ItemInput> = Vec::with_capacity(items.len());
    for item in items {
        match validate_item(item) {
            Ok(()) => valid.push(item),
            Err(err) => {
                tracing::warn!(item = %item.item_id, %err, "item rejected");
                outcomes.insert(item.item_id.clone(), ItemOutcome::Failed(err.into()));
            }
        }
    }

    let entries: Vec<PortfolioEntry> = valid
        .iter()
        .map(|item| PortfolioEntry {
            item_id: item.item_id.clone(),
            series: item.series.clone(),
            unit_cost: item.unit_cost,
        })
        .collect();
    let classifications = classify(&entries, &cfg.classification)?;

    let analyzed: Vec<(ItemId, ItemOutcome)> = valid
        .par_iter()
        .map(|item| {
            let outcome = match classifications.get(&item.item_id) {
                Some(classification) => {
                    let analytics = analyze_item(item, classification, horizon, as_of, cfg);
                    ItemOutcome::Analyzed(Box::new(analytics))
                }
                None => ItemOutcome::Failed(Failure {
                    kind: ErrorKind::MalformedSeries,
                    message: format!("item {} missing from classification ranking", item.item_id),
                }),
            };
            (item.item_id.clone(), outcome)
        })
        .collect();
    outcomes.extend(analyzed);

    let summary = summarize(&outcomes);
    Ok(PortfolioReport {
        items: outcomes,
        summary,
    })
}

fn validate_item(item: &ItemInput) -> AnalyticsResult<()> {
    if !(item.unit_cost.is_finite() && item.unit_cost >= 0.0) {
        return Err(AnalyticsError::malformed_series(format!(
            "item {} has invalid unit cost {}",
            item.item_id, item.unit_cost
        )));
    }
    Ok(())
}

fn analyze_item(
    item: &ItemInput,
    classification: &ClassificationResult,
    horizon: usize,
    as_of: NaiveDate,
    cfg: &AnalyticsConfig,
) -> ItemAnalytics {
    let forecast_result = forecast(&item.series, horizon, ForecastMethod::Auto, &cfg.forecast)
        .map_err(Failure::from);

    let turnover = item.average_on_hand.map(|on_hand| {
        analyze_turnover(&item.series, on_hand, &cfg.turnover).map_err(Failure::from)
    });
    let turnover_class = turnover
        .as_ref()
        .and_then(|result| result.as_ref().ok())
        .map(|result| result.classification);

    let aging = item.lots.as_deref().map(|lots| {
        analyze_aging(lots, as_of, turnover_class, &cfg.aging).map_err(Failure::from)
    });

    let stock_level = item.position.map(|position| {
        analyze_stock_level(position, item.reorder_rule, Some(daily_consumption(&item.series)))
            .map_err(Failure::from)
    });

    ItemAnalytics {
        classification: classification.clone(),
        forecast: forecast_result,
        turnover,
        aging,
        stock_level,
    }
}

/// Average daily consumption implied by the series.
fn daily_consumption(series: &TimeSeries) -> f64 {
    let periods_per_year = series.period_length().periods_per_year() as f64;
    series.sum() * periods_per_year / series.len() as f64 / 365.0
}
