//! Typed errors for the fetch and aggregation pipeline.
//!
//! Only [`ConfigError`] is meant to reach the caller of a cycle; a
//! [`FetchFailure`] is recovered per symbol by the fetcher.
use std::time::Duration;

use thiserror::Error;

/// Rejected configuration, surfaced before any request is made.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Symbol universe is empty")]
    EmptyUniverse,

    #[error("Concurrency limit must be at least 1, got {0}")]
    InvalidConcurrency(usize),

    #[error("At most {max} retries are allowed, got {0}", max = crate::app::fetcher::MAX_RETRIES)]
    InvalidRetries(u32),

    #[error("Fetch timeout must be greater than zero")]
    InvalidTimeout,

    #[error("Invalid symbol '{0}'")]
    InvalidSymbol(String),

    #[error("Duplicate symbol '{0}' in universe")]
    DuplicateSymbol(String),

    /// Watch-list could not be read or parsed; carries path and cause.
    #[error("Failed to load watch-list {0}: {1}")]
    WatchList(String, String),
}

/// Why a single symbol could not be resolved from live data.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FailureReason {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request failed with status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FailureReason {
    /// Timeouts, transport and status errors may succeed on retry; a malformed
    /// payload will not.
    pub fn is_transient(&self) -> bool {
        !matches!(self, FailureReason::Malformed(_))
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("{symbol}: {reason}")]
pub struct FetchFailure {
    pub symbol: String,
    pub reason: FailureReason,
}

impl FetchFailure {
    pub fn new(symbol: &str, reason: FailureReason) -> Self {
        Self {
            symbol: symbol.to_string(),
            reason,
        }
    }

    pub fn malformed(symbol: &str, detail: impl Into<String>) -> Self {
        Self::new(symbol, FailureReason::Malformed(detail.into()))
    }
}

/// Heatmap requested with fewer cells than quotes.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[error("Grid of {rows}x{cols} holds {capacity} cells but basket has {len} quotes")]
pub struct GridOverflow {
    pub rows: usize,
    pub cols: usize,
    pub capacity: usize,
    pub len: usize,
}
