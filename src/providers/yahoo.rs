// src/providers/yahoo.rs
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{MarketError, MarketProvider, SourceError};
use crate::config::{ms, MarketConfig};
use crate::metrics;
use crate::types::{MarketReading, SpotBar};

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>, // unix seconds
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Turn a chart response into chronological daily closes. Bars with a
/// null or non-finite close are dropped; an absent result is an empty series.
pub fn parse_chart(body: &[u8]) -> Result<Vec<SpotBar>, SourceError> {
    let env: ChartEnvelope = serde_json::from_slice(body).map_err(|e| SourceError::Body(e.to_string()))?;
    let Some(res) = env.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let closes = res.indicators.quote.into_iter().next().map(|q| q.close).unwrap_or_default();

    let bars = res
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let close = close.filter(|c| c.is_finite())?;
            Some(SpotBar { ts_ms: ts.checked_mul(1000)?, close })
        })
        .collect();
    Ok(bars)
}

/// Chart-API client for the spot pair and the US short-rate proxy.
pub struct YahooMarket {
    pub http: reqwest::Client,
    pub base_url: String,
    pub timeout: Duration,
    pub spot_symbol: String,
    pub spot_range: String,
    pub rate_symbol: String,
    pub rate_range: String,
    pub interval: String,
}

impl YahooMarket {
    pub fn from_config(cfg: &MarketConfig) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .build()
            .map_err(|e| SourceError::Transport(format!("building http client: {e}")))?;
        Ok(Self::with_client(http, cfg))
    }

    pub fn with_client(http: reqwest::Client, cfg: &MarketConfig) -> Self {
        Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            timeout: ms(cfg.timeout_ms),
            spot_symbol: cfg.spot_symbol.clone(),
            spot_range: cfg.spot_range.clone(),
            rate_symbol: cfg.rate_symbol.clone(),
            rate_range: cfg.rate_range.clone(),
            interval: cfg.interval.clone(),
        }
    }

    /// Daily closes for `symbol` over `range` (e.g. "1mo", "5d").
    pub async fn history(&self, symbol: &str, range: &str) -> Result<Vec<SpotBar>, SourceError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let resp = self
            .http
            .get(&url)
            .query(&[("range", range), ("interval", self.interval.as_str())])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }
        let body = resp.bytes().await?;
        parse_chart(&body)
    }

    async fn series(&self, symbol: &str, range: &str) -> Result<Vec<SpotBar>, MarketError> {
        self.history(symbol, range).await.map_err(|source| {
            metrics::source_failure("market", source.kind());
            MarketError::Source { symbol: symbol.to_string(), source }
        })
    }
}

#[async_trait]
impl MarketProvider for YahooMarket {
    async fn fetch(&self) -> Result<MarketReading, MarketError> {
        let (spot, rate) = tokio::join!(
            self.series(&self.spot_symbol, &self.spot_range),
            self.series(&self.rate_symbol, &self.rate_range),
        );
        let reading = match (spot, rate) {
            (Ok(spot), Ok(rate)) => {
                MarketReading::from_series(&self.spot_symbol, spot, &self.rate_symbol, &rate)
            }
            (Err(e), _) | (_, Err(e)) => Err(e),
        };
        if let Err(e) = &reading {
            tracing::warn!(error = %e, "market data unavailable");
        }
        reading
    }
}
