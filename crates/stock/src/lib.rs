//! `stocklens-stock` — stock-level and reorder-point analysis.
//!
//! Grades an item's current stock position against its reorder rule and
//! consumption rate: status classification, days of stock remaining, and a
//! suggested reorder quantity.

pub mod level;

pub use level::{analyze_stock_level, ReorderRule, StockLevelReport, StockPosition, StockStatus};
