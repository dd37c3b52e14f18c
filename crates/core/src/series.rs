//! Time-series model and builder.
//!
//! Every engine consumes the same shape: a gap-filled, date-ordered series of
//! per-period quantities for one item. [`SeriesBuilder`] produces it from raw
//! stock-movement records; the engines never see raw records.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// Width of one series period.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodLength {
    Daily,
    Weekly,
    Monthly,
}

impl PeriodLength {
    /// Number of periods in a year, used to annualize consumption.
    pub fn periods_per_year(&self) -> usize {
        match self {
            PeriodLength::Daily => 365,
            PeriodLength::Weekly => 52,
            PeriodLength::Monthly => 12,
        }
    }

    /// First day of the period containing `date`.
    fn period_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            PeriodLength::Daily => date,
            PeriodLength::Weekly => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            PeriodLength::Monthly => {
                NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
            }
        }
    }

    /// Index of the period containing `date`, counted from `origin`
    /// (itself a period start).
    fn period_index(&self, origin: NaiveDate, date: NaiveDate) -> usize {
        let start = self.period_start(date);
        let offset = match self {
            PeriodLength::Daily => (start - origin).num_days(),
            PeriodLength::Weekly => (start - origin).num_days() / 7,
            PeriodLength::Monthly => month_index(start) - month_index(origin),
        };
        offset.max(0) as usize
    }
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Direction of a raw stock movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    Receipt,
    Issue,
}

/// Raw stock-movement record as supplied by the ERP provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub date: NaiveDate,
    /// Absolute quantity moved; direction carries the sign.
    pub quantity: f64,
    pub direction: MovementDirection,
}

impl StockMovement {
    pub fn receipt(date: NaiveDate, quantity: f64) -> Self {
        Self {
            date,
            quantity,
            direction: MovementDirection::Receipt,
        }
    }

    pub fn issue(date: NaiveDate, quantity: f64) -> Self {
        Self {
            date,
            quantity,
            direction: MovementDirection::Issue,
        }
    }
}

/// What the per-period value measures.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesMetric {
    /// Signed stock delta: receipts positive, issues negative.
    NetChange,
    /// Outbound consumption only (demand history); receipts are ignored.
    Consumption,
}

/// Fill policy for periods with no recorded activity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapFill {
    Zero,
    ForwardFill,
}

/// Inclusive date range to aggregate over.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }
}

/// Uniform, contiguous, date-ordered numeric series for one item.
///
/// `period_index` is the position in `values`; contiguity is guaranteed by
/// construction, so gaps cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    start: NaiveDate,
    period_length: PeriodLength,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Build a series from already-aggregated per-period values.
    pub fn new(
        start: NaiveDate,
        period_length: PeriodLength,
        values: Vec<f64>,
    ) -> AnalyticsResult<Self> {
        if values.is_empty() {
            return Err(AnalyticsError::malformed_series("series must not be empty"));
        }
        if let Some(v) = values.iter().find(|v| !v.is_finite()) {
            return Err(AnalyticsError::malformed_series(format!(
                "non-finite value {v} in series"
            )));
        }
        Ok(Self {
            start,
            period_length,
            values,
        })
    }

    /// Build a series from explicit `(period_index, value)` points.
    ///
    /// Indices must start at 0 and increase strictly by 1.
    pub fn from_points(
        start: NaiveDate,
        period_length: PeriodLength,
        points: &[(usize, f64)],
    ) -> AnalyticsResult<Self> {
        for (pos, (index, _)) in points.iter().enumerate() {
            if *index != pos {
                return Err(AnalyticsError::malformed_series(format!(
                    "non-contiguous period index {index} at position {pos}"
                )));
            }
        }
        Self::new(
            start,
            period_length,
            points.iter().map(|(_, v)| *v).collect(),
        )
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn period_length(&self) -> PeriodLength {
        self.period_length
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Last `n` values (the whole series when shorter).
    pub fn trailing(&self, n: usize) -> &[f64] {
        let start = self.values.len().saturating_sub(n);
        &self.values[start..]
    }

    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values.iter().copied().enumerate()
    }
}

/// Aggregates raw movement records into a [`TimeSeries`].
#[derive(Debug, Copy, Clone)]
pub struct SeriesBuilder {
    period_length: PeriodLength,
    metric: SeriesMetric,
    gap_fill: GapFill,
}

impl SeriesBuilder {
    pub fn new(period_length: PeriodLength) -> Self {
        Self {
            period_length,
            metric: SeriesMetric::Consumption,
            gap_fill: GapFill::Zero,
        }
    }

    pub fn with_metric(mut self, metric: SeriesMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_gap_fill(mut self, gap_fill: GapFill) -> Self {
        self.gap_fill = gap_fill;
        self
    }

    /// Aggregate `records` into equal-width periods over `range`.
    ///
    /// Records outside the range are ignored; periods with no activity are
    /// filled per the gap-fill policy. Fails when fewer than 2 periods are
    /// producible.
    pub fn build(
        &self,
        records: &[StockMovement],
        range: DateRange,
    ) -> AnalyticsResult<TimeSeries> {
        if range.to < range.from {
            return Err(AnalyticsError::invalid_configuration(format!(
                "date range end {} before start {}",
                range.to, range.from
            )));
        }

        let origin = self.period_length.period_start(range.from);
        let periods = self.period_length.period_index(origin, range.to) + 1;
        if periods < 2 {
            return Err(AnalyticsError::insufficient_data(format!(
                "date range produces {periods} period(s), need at least 2"
            )));
        }

        let mut values = vec![0.0; periods];
        let mut touched = vec![false; periods];

        for record in records {
            if !(record.quantity.is_finite() && record.quantity >= 0.0) {
                return Err(AnalyticsError::malformed_series(format!(
                    "movement on {} has invalid quantity {}",
                    record.date, record.quantity
                )));
            }
            if record.date < range.from || record.date > range.to {
                continue;
            }

            let delta = match (self.metric, record.direction) {
                (SeriesMetric::NetChange, MovementDirection::Receipt) => record.quantity,
                (SeriesMetric::NetChange, MovementDirection::Issue) => -record.quantity,
                (SeriesMetric::Consumption, MovementDirection::Issue) => record.quantity,
                (SeriesMetric::Consumption, MovementDirection::Receipt) => continue,
            };

            let index = self.period_length.period_index(origin, record.date);
            values[index] += delta;
            touched[index] = true;
        }

        if self.gap_fill == GapFill::ForwardFill {
            for i in 1..periods {
                if !touched[i] {
                    values[i] = values[i - 1];
                }
            }
        }

        TimeSeries::new(origin, self.period_length, values)
    }
}
