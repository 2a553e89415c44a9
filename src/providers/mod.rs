// src/providers/mod.rs
use async_trait::async_trait;

use crate::types::{MarketReading, RateReading};

pub mod hkma;
pub mod yahoo;

/// Why a single upstream call did not produce a usable value. Kept typed so
/// each failure mode can be observed and tested; the rate side collapses it
/// to sentinel zeros, the market side wraps it into [`MarketError`].
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("timed out")]
    Timeout,
    #[error("http status {0}")]
    Status(u16),
    #[error("transport: {0}")]
    Transport(String),
    #[error("malformed body: {0}")]
    Body(String),
    #[error("success flag missing or false")]
    NotSuccessful,
    #[error("no records")]
    NoRecords,
    #[error("field missing: {0}")]
    MissingField(&'static str),
}

impl SourceError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::Timeout => "timeout",
            SourceError::Status(_) => "status",
            SourceError::Transport(_) => "transport",
            SourceError::Body(_) => "body",
            SourceError::NotSuccessful => "not_successful",
            SourceError::NoRecords => "no_records",
            SourceError::MissingField(_) => "missing_field",
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SourceError::Timeout
        } else if e.is_decode() || e.is_body() {
            SourceError::Body(e.to_string())
        } else if let Some(status) = e.status() {
            SourceError::Status(status.as_u16())
        } else {
            SourceError::Transport(e.to_string())
        }
    }
}

/// Hard failure of the market side: no peg position can be reported.
#[derive(thiserror::Error, Debug)]
pub enum MarketError {
    #[error("{symbol}: no closes returned")]
    EmptySeries { symbol: String },
    #[error("{symbol}: need at least 2 closes, got {got}")]
    ShortSeries { symbol: String, got: usize },
    #[error("{symbol}: {source}")]
    Source {
        symbol: String,
        #[source]
        source: SourceError,
    },
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Latest HIBOR and interbank liquidity. Never fails; unavailable values
    /// come back as 0.0.
    async fn fetch(&self) -> RateReading;
}

#[async_trait]
pub trait MarketProvider: Send + Sync {
    /// Spot history plus the US reference rate, or why they are unavailable.
    async fn fetch(&self) -> Result<MarketReading, MarketError>;
}
