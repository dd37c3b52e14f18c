//! Inventory aging and obsolescence risk.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stocklens_core::{AnalyticsError, AnalyticsResult, MovementDirection, StockMovement};

use crate::turnover::TurnoverClass;

/// One lot of on-hand stock with its receipt date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockLot {
    pub quantity: f64,
    pub received_on: NaiveDate,
}

impl StockLot {
    pub fn new(quantity: f64, received_on: NaiveDate) -> Self {
        Self {
            quantity,
            received_on,
        }
    }
}

/// One age range of the bucket schedule. Bounds are inclusive, in days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingBucket {
    pub label: String,
    pub from_days: i64,
    /// `None` marks the open-ended final bucket.
    pub to_days: Option<i64>,
}

impl AgingBucket {
    pub fn bounded(label: impl Into<String>, from_days: i64, to_days: i64) -> Self {
        Self {
            label: label.into(),
            from_days,
            to_days: Some(to_days),
        }
    }

    pub fn open_ended(label: impl Into<String>, from_days: i64) -> Self {
        Self {
            label: label.into(),
            from_days,
            to_days: None,
        }
    }

    fn contains(&self, age_days: i64) -> bool {
        age_days >= self.from_days && self.to_days.is_none_or(|to| age_days <= to)
    }
}

/// Aging schedule and risk thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgingConfig {
    /// Contiguous bucket schedule starting at day 0, last bucket open-ended.
    pub buckets: Vec<AgingBucket>,
    /// Stock strictly older than this counts toward the old-quantity share.
    pub old_age_days: i64,
    /// Old-quantity share above which aging concentration is a risk signal.
    pub old_share_threshold: f64,
}

impl Default for AgingConfig {
    fn default() -> Self {
        Self {
            buckets: vec![
                AgingBucket::bounded("0-30 days", 0, 30),
                AgingBucket::bounded("31-60 days", 31, 60),
                AgingBucket::bounded("61-90 days", 61, 90),
                AgingBucket::bounded("91-180 days", 91, 180),
                AgingBucket::bounded("181-365 days", 181, 365),
                AgingBucket::open_ended("over 365 days", 366),
            ],
            old_age_days: 180,
            old_share_threshold: 0.5,
        }
    }
}

impl AgingConfig {
    pub fn validate(&self) -> AnalyticsResult<()> {
        let Some(first) = self.buckets.first() else {
            return Err(AnalyticsError::invalid_configuration(
                "aging schedule must have at least one bucket",
            ));
        };
        if first.from_days != 0 {
            return Err(AnalyticsError::invalid_configuration(
                "aging schedule must start at day 0",
            ));
        }
        for pair in self.buckets.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            match current.to_days {
                Some(to) if next.from_days == to + 1 => {}
                _ => {
                    return Err(AnalyticsError::invalid_configuration(format!(
                        "aging buckets '{}' and '{}' are not contiguous",
                        current.label, next.label
                    )));
                }
            }
        }
        match self.buckets.last() {
            Some(last) if last.to_days.is_none() => {}
            _ => {
                return Err(AnalyticsError::invalid_configuration(
                    "final aging bucket must be open-ended",
                ));
            }
        }
        if !(self.old_share_threshold > 0.0 && self.old_share_threshold <= 1.0) {
            return Err(AnalyticsError::invalid_configuration(format!(
                "old-share threshold {} must be in (0, 1]",
                self.old_share_threshold
            )));
        }
        if self.old_age_days < 0 {
            return Err(AnalyticsError::invalid_configuration(
                "old-age cutoff must be non-negative",
            ));
        }
        Ok(())
    }
}

/// Obsolescence risk tier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Quantity held in one bucket of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgingBucketTotal {
    pub label: String,
    pub quantity: f64,
}

/// Aging analysis output for one item.
///
/// Invariant: bucket quantities sum to `total_quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgingResult {
    /// Totals in schedule order, including empty buckets.
    pub buckets: Vec<AgingBucketTotal>,
    pub total_quantity: f64,
    /// `None` when there are no lots.
    pub oldest_age_days: Option<i64>,
    /// Quantity-weighted mean age; 0 when nothing is on hand.
    pub average_age_days: f64,
    /// Share of quantity strictly older than the old-age cutoff.
    pub old_quantity_share: f64,
    pub risk: RiskLevel,
}

/// Bucket the on-hand lots by age at `as_of` and grade obsolescence risk.
///
/// Risk is high when the item is slow-moving or dead stock AND more than
/// the threshold share of quantity sits past the old-age cutoff; medium
/// when exactly one of those holds; low otherwise. Pass `None` for the
/// turnover class to grade on aging concentration alone.
pub fn analyze_aging(
    lots: &[StockLot],
    as_of: NaiveDate,
    turnover: Option<TurnoverClass>,
    cfg: &AgingConfig,
) -> AnalyticsResult<AgingResult> {
    cfg.validate()?;

    let mut totals = vec![0.0; cfg.buckets.len()];
    let mut total_quantity = 0.0;
    let mut old_quantity = 0.0;
    let mut weighted_age = 0.0;
    let mut oldest_age_days: Option<i64> = None;

    for lot in lots {
        if !(lot.quantity.is_finite() && lot.quantity >= 0.0) {
            return Err(AnalyticsError::malformed_series(format!(
                "lot received {} has invalid quantity {}",
                lot.received_on, lot.quantity
            )));
        }
        if lot.received_on > as_of {
            return Err(AnalyticsError::malformed_series(format!(
                "lot receipt date {} is after the as-of date {as_of}",
                lot.received_on
            )));
        }

        let age_days = (as_of - lot.received_on).num_days();
        let index = cfg
            .buckets
            .iter()
            .position(|bucket| bucket.contains(age_days))
            .ok_or_else(|| {
                AnalyticsError::invalid_configuration(format!(
                    "no aging bucket covers age {age_days} days"
                ))
            })?;

        totals[index] += lot.quantity;
        total_quantity += lot.quantity;
        weighted_age += lot.quantity * age_days as f64;
        if age_days > cfg.old_age_days {
            old_quantity += lot.quantity;
        }
        oldest_age_days = Some(oldest_age_days.map_or(age_days, |oldest| oldest.max(age_days)));
    }

    let old_quantity_share = if total_quantity > 0.0 {
        old_quantity / total_quantity
    } else {
        0.0
    };
    let average_age_days = if total_quantity > 0.0 {
        weighted_age / total_quantity
    } else {
        0.0
    };

    let concentrated = old_quantity_share > cfg.old_share_threshold;
    let slow = turnover.is_some_and(|class| class.is_slow_or_dead());
    let risk = match (concentrated, slow) {
        (true, true) => RiskLevel::High,
        (true, false) | (false, true) => RiskLevel::Medium,
        (false, false) => RiskLevel::Low,
    };

    let buckets = cfg
        .buckets
        .iter()
        .zip(totals)
        .map(|(bucket, quantity)| AgingBucketTotal {
            label: bucket.label.clone(),
            quantity,
        })
        .collect();

    Ok(AgingResult {
        buckets,
        total_quantity,
        oldest_age_days,
        average_age_days,
        old_quantity_share,
        risk,
    })
}

/// Approximate per-lot receipt dates from aggregate on-hand quantity.
///
/// Under FIFO consumption the stock still on hand is the most recently
/// received, so the on-hand quantity is allocated to receipts from newest
/// to oldest. Quantity beyond all recorded receipts has unknown age and is
/// attributed to a synthetic lot received at `as_of`.
pub fn fifo_lots(
    receipts: &[StockMovement],
    on_hand: f64,
    as_of: NaiveDate,
) -> AnalyticsResult<Vec<StockLot>> {
    if !(on_hand.is_finite() && on_hand >= 0.0) {
        return Err(AnalyticsError::malformed_series(format!(
            "on-hand quantity {on_hand} must be non-negative"
        )));
    }

    let mut inbound: Vec<&StockMovement> = receipts
        .iter()
        .filter(|movement| movement.direction == MovementDirection::Receipt)
        .collect();
    inbound.sort_by_key(|movement| std::cmp::Reverse(movement.date));

    let mut lots = Vec::new();
    let mut remaining = on_hand;
    for movement in inbound {
        if remaining <= 0.0 {
            break;
        }
        if !(movement.quantity.is_finite() && movement.quantity >= 0.0) {
            return Err(AnalyticsError::malformed_series(format!(
                "receipt on {} has invalid quantity {}",
                movement.date, movement.quantity
            )));
        }
        let allocated = movement.quantity.min(remaining);
        if allocated > 0.0 {
            lots.push(StockLot::new(allocated, movement.date));
            remaining -= allocated;
        }
    }
    if remaining > 0.0 {
        lots.push(StockLot::new(remaining, as_of));
    }

    lots.sort_by_key(|lot| lot.received_on);
    Ok(lots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lot_aged(days: i64, quantity: f64, as_of: NaiveDate) -> StockLot {
        StockLot::new(quantity, as_of - chrono::Duration::days(days))
    }

    #[test]
    fn buckets_cover_boundary_ages() {
        let as_of = date(2025, 6, 30);
        let lots = vec![
            lot_aged(30, 1.0, as_of),
            lot_aged(31, 2.0, as_of),
            lot_aged(365, 4.0, as_of),
            lot_aged(366, 8.0, as_of),
        ];
        let result = analyze_aging(&lots, as_of, None, &AgingConfig::default()).unwrap();
        assert_eq!(result.buckets[0].quantity, 1.0);
        assert_eq!(result.buckets[1].quantity, 2.0);
        assert_eq!(result.buckets[4].quantity, 4.0);
        assert_eq!(result.buckets[5].quantity, 8.0);
        assert_eq!(result.oldest_age_days, Some(366));
    }

    #[test]
    fn dead_stock_concentrated_in_oldest_buckets_is_high_risk() {
        let as_of = date(2025, 6, 30);
        let lots = vec![lot_aged(400, 70.0, as_of), lot_aged(10, 30.0, as_of)];
        let result = analyze_aging(
            &lots,
            as_of,
            Some(TurnoverClass::DeadStock),
            &AgingConfig::default(),
        )
        .unwrap();
        assert!((result.old_quantity_share - 0.7).abs() < 1e-9);
        assert_eq!(result.risk, RiskLevel::High);
    }

    #[test]
    fn one_risk_signal_alone_is_medium() {
        let as_of = date(2025, 6, 30);

        // Concentration without slow movement.
        let old_lots = vec![lot_aged(400, 70.0, as_of), lot_aged(10, 30.0, as_of)];
        let concentrated = analyze_aging(
            &old_lots,
            as_of,
            Some(TurnoverClass::FastMoving),
            &AgingConfig::default(),
        )
        .unwrap();
        assert_eq!(concentrated.risk, RiskLevel::Medium);

        // Slow movement without concentration.
        let fresh_lots = vec![lot_aged(5, 90.0, as_of), lot_aged(200, 10.0, as_of)];
        let slow = analyze_aging(
            &fresh_lots,
            as_of,
            Some(TurnoverClass::SlowMoving),
            &AgingConfig::default(),
        )
        .unwrap();
        assert_eq!(slow.risk, RiskLevel::Medium);
    }

    #[test]
    fn fresh_fast_moving_stock_is_low_risk() {
        let as_of = date(2025, 6, 30);
        let lots = vec![lot_aged(5, 50.0, as_of), lot_aged(45, 50.0, as_of)];
        let result = analyze_aging(
            &lots,
            as_of,
            Some(TurnoverClass::FastMoving),
            &AgingConfig::default(),
        )
        .unwrap();
        assert_eq!(result.risk, RiskLevel::Low);
    }

    #[test]
    fn empty_lots_produce_zero_totals_and_low_risk() {
        let result =
            analyze_aging(&[], date(2025, 6, 30), None, &AgingConfig::default()).unwrap();
        assert_eq!(result.total_quantity, 0.0);
        assert_eq!(result.oldest_age_days, None);
        assert_eq!(result.average_age_days, 0.0);
        assert_eq!(result.risk, RiskLevel::Low);
    }

    #[test]
    fn future_receipt_date_is_malformed() {
        let as_of = date(2025, 6, 30);
        let lots = vec![StockLot::new(5.0, date(2025, 7, 1))];
        let err = analyze_aging(&lots, as_of, None, &AgingConfig::default()).unwrap_err();
        assert!(matches!(err, AnalyticsError::MalformedSeries(_)));
    }

    #[test]
    fn gapped_bucket_schedule_is_invalid() {
        let cfg = AgingConfig {
            buckets: vec![
                AgingBucket::bounded("0-30 days", 0, 30),
                AgingBucket::open_ended("over 60 days", 61),
            ],
            ..AgingConfig::default()
        };
        let err = analyze_aging(&[], date(2025, 6, 30), None, &cfg).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidConfiguration(_)));
    }

    #[test]
    fn fifo_allocates_on_hand_to_newest_receipts() {
        let receipts = vec![
            StockMovement::receipt(date(2025, 1, 1), 50.0),
            StockMovement::receipt(date(2025, 2, 1), 40.0),
            StockMovement::receipt(date(2025, 3, 1), 30.0),
            StockMovement::issue(date(2025, 3, 10), 25.0),
        ];
        let lots = fifo_lots(&receipts, 60.0, date(2025, 4, 1)).unwrap();

        assert_eq!(lots.len(), 2);
        assert_eq!(lots[0], StockLot::new(30.0, date(2025, 2, 1)));
        assert_eq!(lots[1], StockLot::new(30.0, date(2025, 3, 1)));
    }

    #[test]
    fn fifo_attributes_unexplained_stock_to_the_as_of_date() {
        let receipts = vec![StockMovement::receipt(date(2025, 1, 1), 10.0)];
        let as_of = date(2025, 4, 1);
        let lots = fifo_lots(&receipts, 25.0, as_of).unwrap();

        let total: f64 = lots.iter().map(|lot| lot.quantity).sum();
        assert_eq!(total, 25.0);
        assert!(lots.contains(&StockLot::new(15.0, as_of)));
    }

    proptest! {
        /// Property: bucket quantities always sum to the total on-hand
        /// quantity, for any lot distribution.
        #[test]
        fn bucket_quantities_sum_to_total(
            lots in prop::collection::vec((0i64..800, 0.0f64..500.0), 0..25)
        ) {
            let as_of = date(2025, 6, 30);
            let lots: Vec<StockLot> = lots
                .into_iter()
                .map(|(age, quantity)| lot_aged(age, quantity, as_of))
                .collect();

            let result = analyze_aging(&lots, as_of, None, &AgingConfig::default()).unwrap();
            let bucket_sum: f64 = result.buckets.iter().map(|b| b.quantity).sum();
            prop_assert!((bucket_sum - result.total_quantity).abs() < 1e-6);
        }
    }
}
