//! `stocklens-turnover` — inventory turnover and aging engine.
//!
//! Turnover: how many times a year the stock of an item is consumed and
//! replaced, classified fast/normal/slow/dead. Aging: how long the current
//! on-hand quantity has been sitting, bucketed by receipt age and combined
//! with the turnover class into an obsolescence risk tier.

pub mod aging;
pub mod turnover;

pub use aging::{
    analyze_aging, fifo_lots, AgingBucket, AgingBucketTotal, AgingConfig, AgingResult, RiskLevel,
    StockLot,
};
pub use turnover::{analyze_turnover, TurnoverClass, TurnoverConfig, TurnoverResult};
