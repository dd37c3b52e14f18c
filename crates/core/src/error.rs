//! Analytics error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the analytics engines.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Engine-level error.
///
/// Keep this focused on deterministic input/parameter failures. Every engine
/// validates its own inputs and fails fast with a specific kind instead of
/// producing a degraded silent result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// The series is too short for the requested (or any) computation.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// A seasonal method was requested without enough full cycles of history.
    #[error("insufficient seasonal data: {0}")]
    InsufficientSeasonalData(String),

    /// A threshold or parameter is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The input series or records violate their shape contract
    /// (non-contiguous periods, negative quantities where disallowed).
    #[error("malformed series: {0}")]
    MalformedSeries(String),
}

impl AnalyticsError {
    pub fn insufficient_data(msg: impl Into<String>) -> Self {
        Self::InsufficientData(msg.into())
    }

    pub fn insufficient_seasonal_data(msg: impl Into<String>) -> Self {
        Self::InsufficientSeasonalData(msg.into())
    }

    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn malformed_series(msg: impl Into<String>) -> Self {
        Self::MalformedSeries(msg.into())
    }

    /// Discriminant for tagging per-item failures in batch results.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientData(_) => ErrorKind::InsufficientData,
            Self::InsufficientSeasonalData(_) => ErrorKind::InsufficientSeasonalData,
            Self::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            Self::MalformedSeries(_) => ErrorKind::MalformedSeries,
        }
    }
}

/// Error discriminant, serializable for batch result mappings.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InsufficientData,
    InsufficientSeasonalData,
    InvalidConfiguration,
    MalformedSeries,
}
