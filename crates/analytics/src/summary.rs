//! Reduce-only portfolio summary statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stocklens_classification::{AbcClass, XyzClass};
use stocklens_core::{ErrorKind, ItemId};
use stocklens_forecast::Trend;
use stocklens_turnover::{RiskLevel, TurnoverClass};

use crate::facade::{ItemAnalytics, ItemOutcome};

/// Item counts per ABC class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbcCounts {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

/// Annual value totals per ABC class.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AbcValues {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Item counts per XYZ class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct XyzCounts {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

/// Item counts per detected trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrendCounts {
    pub increasing: usize,
    pub decreasing: usize,
    pub stable: usize,
}

/// Item counts per turnover class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnoverCounts {
    pub fast_moving: usize,
    pub normal: usize,
    pub slow_moving: usize,
    pub dead_stock: usize,
}

/// Item counts per obsolescence risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// Mean back-test accuracy over items whose forecast carried metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyAverages {
    pub mae: f64,
    pub rmse: f64,
    /// Mean over items with a defined MAPE; `None` when no item had one.
    pub mape: Option<f64>,
    pub forecasts_scored: usize,
}

/// Portfolio-level rollup of every engine's per-item results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_items: usize,
    pub analyzed_items: usize,
    pub failed_items: usize,
    pub failure_kinds: BTreeMap<ErrorKind, usize>,
    pub total_annual_value: f64,
    pub abc_counts: AbcCounts,
    pub abc_values: AbcValues,
    pub xyz_counts: XyzCounts,
    pub trend_counts: TrendCounts,
    pub seasonal_items: usize,
    pub average_accuracy: Option<AccuracyAverages>,
    pub turnover_counts: TurnoverCounts,
    pub risk_counts: RiskCounts,
}

/// Reduce per-item outcomes into the portfolio summary.
pub fn summarize(outcomes: &BTreeMap<ItemId, ItemOutcome>) -> PortfolioSummary {
    let mut summary = PortfolioSummary {
        total_items: outcomes.len(),
        analyzed_items: 0,
        failed_items: 0,
        failure_kinds: BTreeMap::new(),
        total_annual_value: 0.0,
        abc_counts: AbcCounts::default(),
        abc_values: AbcValues::default(),
        xyz_counts: XyzCounts::default(),
        trend_counts: TrendCounts::default(),
        seasonal_items: 0,
        average_accuracy: None,
        turnover_counts: TurnoverCounts::default(),
        risk_counts: RiskCounts::default(),
    };

    let mut mae_sum = 0.0;
    let mut rmse_sum = 0.0;
    let mut scored = 0usize;
    let mut mape_sum = 0.0;
    let mut mape_scored = 0usize;

    for outcome in outcomes.values() {
        let analytics: &ItemAnalytics = match outcome {
            ItemOutcome::Analyzed(analytics) => analytics,
            ItemOutcome::Failed(failure) => {
                summary.failed_items += 1;
                *summary.failure_kinds.entry(failure.kind).or_insert(0) += 1;
                continue;
            }
        };
        summary.analyzed_items += 1;

        let classification = &analytics.classification;
        summary.total_annual_value += classification.annual_value;
        match classification.abc_class {
            AbcClass::A => {
                summary.abc_counts.a += 1;
                summary.abc_values.a += classification.annual_value;
            }
            AbcClass::B => {
                summary.abc_counts.b += 1;
                summary.abc_values.b += classification.annual_value;
            }
            AbcClass::C => {
                summary.abc_counts.c += 1;
                summary.abc_values.c += classification.annual_value;
            }
        }
        match classification.xyz_class {
            XyzClass::X => summary.xyz_counts.x += 1,
            XyzClass::Y => summary.xyz_counts.y += 1,
            XyzClass::Z => summary.xyz_counts.z += 1,
        }

        if let Ok(forecast) = &analytics.forecast {
            match forecast.trend {
                Trend::Increasing => summary.trend_counts.increasing += 1,
                Trend::Decreasing => summary.trend_counts.decreasing += 1,
                Trend::Stable => summary.trend_counts.stable += 1,
            }
            if forecast.seasonality_detected {
                summary.seasonal_items += 1;
            }
            if let Some(accuracy) = &forecast.accuracy {
                mae_sum += accuracy.mae;
                rmse_sum += accuracy.rmse;
                scored += 1;
                if let Some(mape) = accuracy.mape {
                    mape_sum += mape;
                    mape_scored += 1;
                }
            }
        }

        if let Some(Ok(turnover)) = &analytics.turnover {
            match turnover.classification {
                TurnoverClass::FastMoving => summary.turnover_counts.fast_moving += 1,
                TurnoverClass::Normal => summary.turnover_counts.normal += 1,
                TurnoverClass::SlowMoving => summary.turnover_counts.slow_moving += 1,
                TurnoverClass::DeadStock => summary.turnover_counts.dead_stock += 1,
            }
        }
        if let Some(Ok(aging)) = &analytics.aging {
            match aging.risk {
                RiskLevel::Low => summary.risk_counts.low += 1,
                RiskLevel::Medium => summary.risk_counts.medium += 1,
                RiskLevel::High => summary.risk_counts.high += 1,
            }
        }
    }

    if scored > 0 {
        summary.average_accuracy = Some(AccuracyAverages {
            mae: mae_sum / scored as f64,
            rmse: rmse_sum / scored as f64,
            mape: (mape_scored > 0).then(|| mape_sum / mape_scored as f64),
            forecasts_scored: scored,
        });
    }

    summary
}
