//! `stocklens-analytics` — portfolio analytics facade.
//!
//! Orchestrates the forecasting, classification, turnover/aging, and
//! stock-level engines over a whole portfolio and reduces their per-item
//! results into summary statistics. Aggregation only: no analytical logic
//! lives here, and no state survives a call.

pub mod facade;
pub mod summary;

pub use facade::{
    analyze_portfolio, AnalyticsConfig, Failure, ItemAnalytics, ItemInput, ItemOutcome,
    PortfolioReport,
};
pub use summary::PortfolioSummary;
