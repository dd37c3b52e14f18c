//! ABC (value) and XYZ (variability) classification.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stocklens_core::stats;
use stocklens_core::{AnalyticsError, AnalyticsResult, ItemId, TimeSeries};

use crate::recommendation::recommendation;

/// Value class: share of total annual consumption value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

impl AbcClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbcClass::A => "A",
            AbcClass::B => "B",
            AbcClass::C => "C",
        }
    }
}

/// Variability class: demand predictability from the coefficient of
/// variation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XyzClass {
    X,
    Y,
    Z,
}

impl XyzClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            XyzClass::X => "X",
            XyzClass::Y => "Y",
            XyzClass::Z => "Z",
        }
    }
}

/// How annual consumption is derived from a series shorter than a year.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Annualization {
    /// Scale the observed window sum by periods-per-year / window length.
    Extrapolate,
    /// Use the observed window sum as-is.
    Observed,
}

/// Classification thresholds and policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Cumulative value share up to which items are class A.
    pub abc_a_threshold: f64,
    /// Cumulative value share up to which items are class B.
    pub abc_b_threshold: f64,
    /// CV below which demand counts as stable (X).
    pub xyz_x_threshold: f64,
    /// CV below which demand counts as variable (Y); at or above is Z.
    pub xyz_y_threshold: f64,
    pub annualization: Annualization,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            abc_a_threshold: 0.80,
            abc_b_threshold: 0.95,
            xyz_x_threshold: 0.5,
            xyz_y_threshold: 1.0,
            annualization: Annualization::Extrapolate,
        }
    }
}

impl ClassificationConfig {
    pub fn with_abc_thresholds(mut self, a: f64, b: f64) -> Self {
        self.abc_a_threshold = a;
        self.abc_b_threshold = b;
        self
    }

    pub fn with_xyz_thresholds(mut self, x: f64, y: f64) -> Self {
        self.xyz_x_threshold = x;
        self.xyz_y_threshold = y;
        self
    }

    pub fn with_annualization(mut self, annualization: Annualization) -> Self {
        self.annualization = annualization;
        self
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        if !(self.abc_a_threshold > 0.0
            && self.abc_a_threshold < self.abc_b_threshold
            && self.abc_b_threshold <= 1.0)
        {
            return Err(AnalyticsError::invalid_configuration(format!(
                "abc thresholds ({}, {}) must satisfy 0 < a < b <= 1",
                self.abc_a_threshold, self.abc_b_threshold
            )));
        }
        if !(self.xyz_x_threshold > 0.0 && self.xyz_x_threshold < self.xyz_y_threshold) {
            return Err(AnalyticsError::invalid_configuration(format!(
                "xyz thresholds ({}, {}) must satisfy 0 < x < y",
                self.xyz_x_threshold, self.xyz_y_threshold
            )));
        }
        Ok(())
    }
}

/// One item of the portfolio to classify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub item_id: ItemId,
    pub series: TimeSeries,
    pub unit_cost: f64,
}

/// Classification output for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub abc_class: AbcClass,
    pub xyz_class: XyzClass,
    pub annual_quantity: f64,
    pub annual_value: f64,
    /// `None` when the window mean is not positive (CV undefined); such
    /// items are class Z by rule, not by error.
    pub coefficient_of_variation: Option<f64>,
    /// This item's share of total portfolio value.
    pub value_share: f64,
    /// Running share including this item, in ranking order.
    pub cumulative_share: f64,
    /// Combined matrix cell, "AX" through "CZ".
    pub combined: String,
    pub recommendation: String,
}

/// Classify a portfolio into the ABC/XYZ matrix.
///
/// Items are ranked by annual consumption value (descending, ties by item
/// id ascending) and partitioned exhaustively by cumulative value share.
/// The result map holds exactly one entry per input item.
pub fn classify(
    portfolio: &[PortfolioEntry],
    cfg: &ClassificationConfig,
) -> AnalyticsResult<BTreeMap<ItemId, ClassificationResult>> {
    cfg.validate()?;

    struct Metrics<'a> {
        entry: &'a PortfolioEntry,
        annual_quantity: f64,
        annual_value: f64,
        cv: Option<f64>,
    }

    let mut metrics = Vec::with_capacity(portfolio.len());
    for entry in portfolio {
        if !(entry.unit_cost.is_finite() && entry.unit_cost >= 0.0) {
            return Err(AnalyticsError::malformed_series(format!(
                "item {} has invalid unit cost {}",
                entry.item_id, entry.unit_cost
            )));
        }

        let periods_per_year = entry.series.period_length().periods_per_year();
        let window = entry.series.trailing(periods_per_year);
        let mut annual_quantity = window.iter().sum::<f64>();
        if cfg.annualization == Annualization::Extrapolate && window.len() < periods_per_year {
            annual_quantity *= periods_per_year as f64 / window.len() as f64;
        }

        let mean = stats::mean(window);
        let cv = (mean > 0.0).then(|| stats::population_std_dev(window) / mean);

        metrics.push(Metrics {
            entry,
            annual_quantity,
            annual_value: entry.unit_cost * annual_quantity,
            cv,
        });
    }

    metrics.sort_by(|a, b| {
        b.annual_value
            .total_cmp(&a.annual_value)
            .then_with(|| a.entry.item_id.cmp(&b.entry.item_id))
    });

    let total_value: f64 = metrics.iter().map(|m| m.annual_value).sum();
    tracing::debug!(items = metrics.len(), total_value, "classifying portfolio");

    let mut results = BTreeMap::new();
    let mut cumulative_value = 0.0;
    for m in metrics {
        // Accumulate value, not shares; summing rounded shares drifts
        // past the class boundaries.
        cumulative_value += m.annual_value;
        let (value_share, cumulative) = if total_value > 0.0 {
            (m.annual_value / total_value, cumulative_value / total_value)
        } else {
            (0.0, 0.0)
        };

        let abc = if cumulative <= cfg.abc_a_threshold {
            AbcClass::A
        } else if cumulative <= cfg.abc_b_threshold {
            AbcClass::B
        } else {
            AbcClass::C
        };
        let xyz = match m.cv {
            None => XyzClass::Z,
            Some(cv) if cv < cfg.xyz_x_threshold => XyzClass::X,
            Some(cv) if cv < cfg.xyz_y_threshold => XyzClass::Y,
            Some(_) => XyzClass::Z,
        };

        results.insert(
            m.entry.item_id.clone(),
            ClassificationResult {
                abc_class: abc,
                xyz_class: xyz,
                annual_quantity: m.annual_quantity,
                annual_value: m.annual_value,
                coefficient_of_variation: m.cv,
                value_share,
                cumulative_share: cumulative,
                combined: format!("{}{}", abc.as_str(), xyz.as_str()),
                recommendation: recommendation(abc, xyz).to_string(),
            },
        );
    }

    Ok(results)
}
