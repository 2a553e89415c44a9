// src/providers/hkma.rs
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

use super::{RateProvider, SourceError};
use crate::config::{ms, HkmaConfig};
use crate::metrics;
use crate::types::RateReading;

const LIQUIDITY_PATH: &str = "/daily-monetary-statistics/daily-figures-interbank-liquidity";
const HIBOR_PATH: &str = "/monthly-statistical-bulletin/er-ir/hk-interbank-ir-daily";

// Tried in order; the dataset has used both names for the 3M fixing.
const HIBOR_3M_FIELDS: [&str; 2] = ["ir_3m", "ir_hibor_3m"];
const HIBOR_3M_FIELDS_LABEL: &str = "ir_3m or ir_hibor_3m";

/// What the liquidity dataset gives us: the balance itself plus a 1M HIBOR
/// fixing that stands in for the 3M rate when the precision query fails.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LiquidityRecord {
    pub closing_balance: f64,
    pub hibor_1m: f64,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    header: Option<Header>,
    #[serde(default)]
    result: Option<ResultBody>,
}

#[derive(Debug, Deserialize)]
struct Header {
    #[serde(default)]
    success: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ResultBody {
    #[serde(default)]
    records: Vec<Map<String, Value>>,
}

/// Client for the HKMA market-data-and-statistics API.
pub struct HkmaRates {
    pub http: reqwest::Client,
    pub base_url: String,
    pub timeout: Duration,
}

impl HkmaRates {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self { http, base_url: base_url.into().trim_end_matches('/').to_string(), timeout }
    }

    pub fn from_config(cfg: &HkmaConfig) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .build()
            .map_err(|e| SourceError::Transport(format!("building http client: {e}")))?;
        Ok(Self::new(http, cfg.base_url.clone(), ms(cfg.timeout_ms)))
    }

    /// Query A: most recent daily interbank liquidity figure.
    pub async fn query_liquidity(&self) -> Result<LiquidityRecord, SourceError> {
        let rec = self
            .latest_record(
                LIQUIDITY_PATH,
                &[("pagesize", "1"), ("sortby", "end_of_date"), ("sortorder", "desc")],
            )
            .await?;
        Ok(LiquidityRecord {
            closing_balance: number_field(&rec, "closing_balance").unwrap_or(0.0),
            hibor_1m: number_field(&rec, "hibor_fixing_1m").unwrap_or(0.0),
        })
    }

    /// Query B: most recent 3M HIBOR fixing.
    pub async fn query_hibor_3m(&self) -> Result<f64, SourceError> {
        let rec = self
            .latest_record(
                HIBOR_PATH,
                &[
                    ("pagesize", "1"),
                    ("segment", "hibor.fixing"),
                    ("sortby", "end_of_day"),
                    ("sortorder", "desc"),
                ],
            )
            .await?;
        hibor_3m_field(&rec)
    }

    async fn latest_record(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Map<String, Value>, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .query(params)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }
        let body = resp.bytes().await?;
        parse_latest_record(&body)
    }
}

/// Unwrap `{header:{success}, result:{records:[..]}}` down to its first record.
pub(crate) fn parse_latest_record(body: &[u8]) -> Result<Map<String, Value>, SourceError> {
    let env: Envelope = serde_json::from_slice(body).map_err(|e| SourceError::Body(e.to_string()))?;
    if env.header.and_then(|h| h.success) != Some(true) {
        return Err(SourceError::NotSuccessful);
    }
    env.result
        .and_then(|r| r.records.into_iter().next())
        .ok_or(SourceError::NoRecords)
}

/// Numeric field that may arrive as a JSON number or a numeric string.
/// `null`, empty and unparseable values count as absent.
fn number_field(rec: &Map<String, Value>, key: &str) -> Option<f64> {
    rec.get(key).and_then(number_value)
}

fn number_value(v: &Value) -> Option<f64> {
    let v = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// The first present, non-blank 3M field decides; a malformed value there
/// does not fall through to the next name.
fn hibor_3m_field(rec: &Map<String, Value>) -> Result<f64, SourceError> {
    let (key, raw) = HIBOR_3M_FIELDS
        .iter()
        .find_map(|k| rec.get(*k).filter(|v| !is_blank(v)).map(|v| (*k, v)))
        .ok_or(SourceError::MissingField(HIBOR_3M_FIELDS_LABEL))?;
    number_value(raw).ok_or_else(|| SourceError::Body(format!("{key} is not numeric: {raw}")))
}

/// Reconcile the two queries. Query B wins when it is strictly positive,
/// otherwise query A's 1M fixing, otherwise 0.0. Liquidity only ever comes
/// from query A.
pub fn merge_rate_reading(
    liquidity: &Result<LiquidityRecord, SourceError>,
    hibor_3m: &Result<f64, SourceError>,
) -> RateReading {
    let backup = liquidity.as_ref().ok().copied().unwrap_or_default();
    let reference_rate_3m = match hibor_3m {
        Ok(v) if *v > 0.0 => *v,
        _ => backup.hibor_1m,
    };
    RateReading { reference_rate_3m, liquidity: backup.closing_balance }
}

#[async_trait]
impl RateProvider for HkmaRates {
    async fn fetch(&self) -> RateReading {
        let (liq, hibor) = tokio::join!(self.query_liquidity(), self.query_hibor_3m());

        if let Err(e) = &liq {
            tracing::warn!(source = "hkma.liquidity", reason = e.kind(), error = %e, "liquidity query failed");
            metrics::source_failure("hkma.liquidity", e.kind());
        }
        if let Err(e) = &hibor {
            tracing::warn!(source = "hkma.hibor", reason = e.kind(), error = %e, "hibor 3m query failed");
            metrics::source_failure("hkma.hibor", e.kind());
        }

        let reading = merge_rate_reading(&liq, &hibor);
        tracing::debug!(hibor = reading.reference_rate_3m, liquidity = reading.liquidity, "hkma reading");
        reading
    }
}
