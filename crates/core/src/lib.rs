//! `stocklens-core` — shared analytics building blocks.
//!
//! This crate contains **pure computation** primitives (no IO, no transport):
//! the error model, item identifiers, the time-series model + builder every
//! engine consumes, and the statistical helpers they share.

pub mod error;
pub mod id;
pub mod series;
pub mod stats;

pub use error::{AnalyticsError, AnalyticsResult, ErrorKind};
pub use id::ItemId;
pub use series::{
    DateRange, GapFill, MovementDirection, PeriodLength, SeriesBuilder, SeriesMetric,
    StockMovement, TimeSeries,
};
