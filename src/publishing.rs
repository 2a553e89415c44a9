// src/publishing.rs
use chrono::{DateTime, Utc};

use crate::providers::MarketError;
use crate::signal::{Assessment, DataGap};
use crate::types::Signal;

/// Sink for evaluation results; the display layer lives behind this.
#[async_trait::async_trait]
pub trait Publisher: Send + Sync + 'static {
    async fn publish_assessment(&self, a: &Assessment) -> anyhow::Result<()>;
    /// The one user-visible failure: no market data, so no signal.
    async fn publish_unavailable(&self, err: &MarketError) -> anyhow::Result<()>;
}

/// Plain-text console report.
pub struct StdoutPublisher;

impl StdoutPublisher {
    pub fn render(a: &Assessment) -> String {
        let s = &a.snapshot;
        let mut out = String::new();
        out.push_str(&format!("USD/HKD peg monitor  @ {}\n", Utc::now().format("%H:%M:%S")));
        out.push_str(&format!(
            "spot {:.4} ({:+.4})  us3m {:.2}%  hibor {:.2}%  spread {:+.2}%  liquidity {:.0}M{}\n",
            s.spot(),
            a.spot_change,
            s.us_rate(),
            s.hk_rate(),
            a.spread,
            s.liquidity(),
            if a.liquidity_ok { "" } else { " (low)" },
        ));

        let headline = match &a.signal {
            Signal::Buy { target, .. } => format!("BUY  target {target:.4}"),
            Signal::Sell { target, .. } => format!("SELL target {target:.4}"),
            Signal::Neutral { .. } => "NEUTRAL".to_string(),
        };
        out.push_str(&format!("{headline}: {}\n", a.signal.rationale()));
        out.push_str(&format!("peg position {:.0}% of 7.75-7.85\n", a.band_position * 100.0));
        if !a.in_band {
            out.push_str("! spot outside the peg band\n");
        }

        if let Some(adv) = a.advisory {
            out.push_str(&format!("! {}\n", adv.message()));
        }
        for gap in &a.gaps {
            let what = match gap {
                DataGap::HkRateMissing => "hibor unavailable, spread uses 0.00",
                DataGap::LiquidityMissing => "liquidity unavailable",
            };
            out.push_str(&format!("? {what}\n"));
        }
        if let (Some(first), Some(last)) = (s.spot_history().first(), s.spot_history().last()) {
            out.push_str(&format!(
                "history {} bars  {} .. {}\n",
                s.spot_history().len(),
                fmt_day(first.ts_ms),
                fmt_day(last.ts_ms),
            ));
        }
        out
    }
}

fn fmt_day(ts_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ts_ms)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| ts_ms.to_string())
}

#[async_trait::async_trait]
impl Publisher for StdoutPublisher {
    async fn publish_assessment(&self, a: &Assessment) -> anyhow::Result<()> {
        print!("{}", Self::render(a));
        Ok(())
    }
    async fn publish_unavailable(&self, err: &MarketError) -> anyhow::Result<()> {
        println!("market data unavailable ({err}); refresh to retry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThresholdConfig;
    use crate::signal::SignalEngine;
    use crate::snapshot::SnapshotBuilder;
    use crate::types::{MarketReading, RateReading, SpotBar};

    #[test]
    fn render_mentions_signal_advisory_and_gaps() {
        let market = MarketReading::from_series(
            "USDHKD=X",
            vec![
                SpotBar { ts_ms: 1_700_000_000_000, close: 7.8450 },
                SpotBar { ts_ms: 1_700_086_400_000, close: 7.8460 },
            ],
            "^IRX",
            &[SpotBar { ts_ms: 1_700_086_400_000, close: 5.0 }],
        )
        .unwrap();
        let snap = SnapshotBuilder::build(&market, RateReading { reference_rate_3m: 4.3, liquidity: 0.0 });
        let a = SignalEngine::assess(snap, &ThresholdConfig::default());

        let text = StdoutPublisher::render(&a);
        assert!(text.contains("NEUTRAL"), "{text}");
        assert!(text.contains("probable intervention (USD sell)"), "{text}");
        assert!(text.contains("liquidity unavailable"), "{text}");
        assert!(text.contains("2023-11-14 .. 2023-11-15"), "{text}");
        assert!(!text.contains("outside the peg band"), "{text}");
    }
}
