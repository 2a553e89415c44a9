// src/types.rs
use serde::{Deserialize, Serialize};

use crate::providers::MarketError;

/// Hong Kong side of the snapshot. Both fields use 0.0 as the
/// "source unavailable" sentinel, never `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RateReading {
    pub reference_rate_3m: f64, // HIBOR, percent
    pub liquidity: f64,         // aggregate closing balance, HKD millions
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotBar {
    pub ts_ms: i64, // unix ms, bar open
    pub close: f64,
}

/// Market side of the snapshot. Only constructible through
/// [`MarketReading::from_series`], which guarantees at least two spot bars
/// and one rate bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketReading {
    spot_latest: f64,
    spot_previous: f64,
    spot_series: Vec<SpotBar>,
    us_rate_3m: f64,
}

impl MarketReading {
    /// Build a reading from the raw spot and reference-rate series, both in
    /// chronological order (most recent last).
    pub fn from_series(
        spot_symbol: &str,
        spot_series: Vec<SpotBar>,
        rate_symbol: &str,
        rate_series: &[SpotBar],
    ) -> Result<Self, MarketError> {
        let us_rate_3m = match rate_series.last() {
            Some(bar) => bar.close,
            None => return Err(MarketError::EmptySeries { symbol: rate_symbol.to_string() }),
        };
        let n = spot_series.len();
        if n == 0 {
            return Err(MarketError::EmptySeries { symbol: spot_symbol.to_string() });
        }
        if n < 2 {
            return Err(MarketError::ShortSeries { symbol: spot_symbol.to_string(), got: n });
        }
        Ok(Self {
            spot_latest: spot_series[n - 1].close,
            spot_previous: spot_series[n - 2].close,
            spot_series,
            us_rate_3m,
        })
    }

    pub fn spot_latest(&self) -> f64 { self.spot_latest }
    pub fn spot_previous(&self) -> f64 { self.spot_previous }
    pub fn spot_series(&self) -> &[SpotBar] { &self.spot_series }
    pub fn us_rate_3m(&self) -> f64 { self.us_rate_3m }
}

/// Merged view handed to the signal engine. Never partially populated; see
/// [`crate::snapshot::SnapshotBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub(crate) spot: f64,
    pub(crate) spot_previous: f64,
    pub(crate) spot_history: Vec<SpotBar>,
    pub(crate) us_rate: f64,
    pub(crate) hk_rate: f64,
    pub(crate) liquidity: f64,
}

impl Snapshot {
    pub fn spot(&self) -> f64 { self.spot }
    pub fn spot_previous(&self) -> f64 { self.spot_previous }
    pub fn spot_history(&self) -> &[SpotBar] { &self.spot_history }
    pub fn us_rate(&self) -> f64 { self.us_rate }
    pub fn hk_rate(&self) -> f64 { self.hk_rate }
    pub fn liquidity(&self) -> f64 { self.liquidity }

    /// US minus HK short rate, percentage points. Uses `hk_rate` as-is, so a
    /// sentinel zero widens the spread to the full US rate.
    #[inline]
    pub fn spread(&self) -> f64 { self.us_rate - self.hk_rate }

    #[inline]
    pub fn spot_change(&self) -> f64 { self.spot - self.spot_previous }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalState { Buy, Sell, Neutral }

impl SignalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalState::Buy => "buy",
            SignalState::Sell => "sell",
            SignalState::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SellReason { LiquidityCrisis, RateInversion }

impl SellReason {
    pub fn label(&self) -> &'static str {
        match self {
            SellReason::LiquidityCrisis => "liquidity crisis",
            SellReason::RateInversion => "rate inversion",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Signal {
    Buy { rationale: String, target: f64 },
    Sell { reason: SellReason, rationale: String, target: f64 },
    Neutral { rationale: String },
}

impl Signal {
    pub fn state(&self) -> SignalState {
        match self {
            Signal::Buy { .. } => SignalState::Buy,
            Signal::Sell { .. } => SignalState::Sell,
            Signal::Neutral { .. } => SignalState::Neutral,
        }
    }

    pub fn rationale(&self) -> &str {
        match self {
            Signal::Buy { rationale, .. }
            | Signal::Sell { rationale, .. }
            | Signal::Neutral { rationale } => rationale,
        }
    }

    pub fn target(&self) -> Option<f64> {
        match self {
            Signal::Buy { target, .. } | Signal::Sell { target, .. } => Some(*target),
            Signal::Neutral { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(closes: &[f64]) -> Vec<SpotBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| SpotBar { ts_ms: 1_700_000_000_000 + i as i64 * 86_400_000, close: *c })
            .collect()
    }

    #[test]
    fn reading_takes_last_two_spot_closes_and_last_rate() {
        let r = MarketReading::from_series(
            "USDHKD=X",
            bars(&[7.81, 7.82, 7.831, 7.83]),
            "^IRX",
            &bars(&[5.1, 5.05, 5.0]),
        )
        .unwrap();
        assert_eq!(r.spot_latest(), 7.83);
        assert_eq!(r.spot_previous(), 7.831);
        assert_eq!(r.us_rate_3m(), 5.0);
        assert_eq!(r.spot_series().len(), 4);
        assert!(r.spot_series().windows(2).all(|w| w[0].ts_ms < w[1].ts_ms));
    }

    #[test]
    fn empty_spot_is_unavailable() {
        let err = MarketReading::from_series("USDHKD=X", vec![], "^IRX", &bars(&[5.0])).unwrap_err();
        assert!(matches!(err, MarketError::EmptySeries { ref symbol } if symbol == "USDHKD=X"));
    }

    #[test]
    fn empty_rate_is_unavailable() {
        let err = MarketReading::from_series("USDHKD=X", bars(&[7.8, 7.81]), "^IRX", &[]).unwrap_err();
        assert!(matches!(err, MarketError::EmptySeries { ref symbol } if symbol == "^IRX"));
    }

    #[test]
    fn single_spot_bar_is_too_short() {
        let err = MarketReading::from_series("USDHKD=X", bars(&[7.8]), "^IRX", &bars(&[5.0])).unwrap_err();
        assert!(matches!(err, MarketError::ShortSeries { got: 1, .. }));
    }

    #[test]
    fn signal_accessors() {
        let s = Signal::Sell {
            reason: SellReason::RateInversion,
            rationale: "x".into(),
            target: 7.751,
        };
        assert_eq!(s.state(), SignalState::Sell);
        assert_eq!(s.target(), Some(7.751));
        assert_eq!(Signal::Neutral { rationale: "calm".into() }.target(), None);
    }
}
