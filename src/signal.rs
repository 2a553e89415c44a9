// src/signal.rs
use serde::Serialize;

use crate::config::ThresholdConfig;
use crate::risk::{advisory_for, InterventionAdvisory, PEG_BAND};
use crate::types::{SellReason, Signal, Snapshot};

/// BUY only fires below this spot, leaving room up to the target.
pub const BUY_SPOT_CEILING: f64 = 7.8450;
pub const BUY_TARGET: f64 = 7.8490;
pub const SELL_TARGET: f64 = 7.7510;

/// Sentinel-zero inputs spotted in a snapshot. Reported alongside the
/// signal; they do not alter it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataGap {
    HkRateMissing,
    LiquidityMissing,
}

/// Everything the display layer needs from one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub snapshot: Snapshot,
    pub signal: Signal,
    pub advisory: Option<InterventionAdvisory>,
    pub spread: f64,
    pub spot_change: f64,
    pub band_position: f64,
    pub in_band: bool,
    pub liquidity_ok: bool,
    pub gaps: Vec<DataGap>,
}

pub struct SignalEngine;

impl SignalEngine {
    /// First matching rule wins:
    /// 1. BUY   spread > threshold and spot < 7.8450
    /// 2. SELL  0 < liquidity < threshold, or spread < 0
    /// 3. NEUTRAL
    pub fn evaluate(snapshot: &Snapshot, cfg: &ThresholdConfig) -> Signal {
        let spread = snapshot.spread();

        if spread > cfg.spread_threshold && snapshot.spot() < BUY_SPOT_CEILING {
            return Signal::Buy {
                rationale: format!("rate differential {spread:+.2}% favours USD"),
                target: BUY_TARGET,
            };
        }

        // 0.0 means the liquidity feed was down, not that the system is dry.
        let liquidity_crisis = snapshot.liquidity() > 0.0 && snapshot.liquidity() < cfg.liquidity_threshold;
        if liquidity_crisis || spread < 0.0 {
            let reason = if liquidity_crisis { SellReason::LiquidityCrisis } else { SellReason::RateInversion };
            return Signal::Sell {
                reason,
                rationale: format!("{} detected (spread {spread:+.2}%), pressure on HKD", reason.label()),
                target: SELL_TARGET,
            };
        }

        Signal::Neutral { rationale: "market calm, no clear statistical edge".to_string() }
    }

    pub fn assess(snapshot: Snapshot, cfg: &ThresholdConfig) -> Assessment {
        let signal = Self::evaluate(&snapshot, cfg);

        let mut gaps = Vec::new();
        if snapshot.hk_rate() == 0.0 {
            gaps.push(DataGap::HkRateMissing);
        }
        if snapshot.liquidity() == 0.0 {
            gaps.push(DataGap::LiquidityMissing);
        }

        Assessment {
            advisory: advisory_for(snapshot.spot()),
            spread: snapshot.spread(),
            spot_change: snapshot.spot_change(),
            band_position: PEG_BAND.position(snapshot.spot()),
            in_band: PEG_BAND.contains(snapshot.spot()),
            liquidity_ok: snapshot.liquidity() > cfg.liquidity_threshold,
            gaps,
            signal,
            snapshot,
        }
    }
}
