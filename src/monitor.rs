// src/monitor.rs
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ThresholdConfig;
use crate::metrics;
use crate::providers::{MarketError, MarketProvider, RateProvider};
use crate::publishing::Publisher;
use crate::signal::{Assessment, SignalEngine};
use crate::snapshot::SnapshotBuilder;
use crate::types::Snapshot;

/// One evaluation pass: fetch both sides, merge, classify, publish. Holds no
/// state between passes, so a refresh can be re-triggered at any time and a
/// superseded one simply dropped.
pub struct PegMonitor<Pu>
where
    Pu: Publisher + Send + Sync + 'static,
{
    pub thresholds: ThresholdConfig,
    pub publisher: Pu,
    pub rates: Arc<dyn RateProvider>,
    pub market: Arc<dyn MarketProvider>,
}

impl<Pu> PegMonitor<Pu>
where
    Pu: Publisher + Send + Sync + 'static,
{
    pub fn new(
        thresholds: ThresholdConfig,
        publisher: Pu,
        rates: Arc<dyn RateProvider>,
        market: Arc<dyn MarketProvider>,
    ) -> Self {
        Self { thresholds, publisher, rates, market }
    }

    /// Both sources run concurrently; the rate side cannot fail, so the only
    /// error is the market side being unavailable.
    pub async fn collect(&self) -> Result<Snapshot, MarketError> {
        let (rates, market) = tokio::join!(self.rates.fetch(), self.market.fetch());
        let market = market?;
        Ok(SnapshotBuilder::build(&market, rates))
    }

    pub async fn refresh(&self) -> Result<Assessment, MarketError> {
        let snapshot = match self.collect().await {
            Ok(s) => s,
            Err(e) => {
                metrics::signal("unavailable");
                if let Err(pe) = self.publisher.publish_unavailable(&e).await {
                    tracing::warn!("publish_unavailable failed: {pe:?}");
                }
                return Err(e);
            }
        };

        let assessment = SignalEngine::assess(snapshot, &self.thresholds);
        metrics::signal(assessment.signal.state().as_str());
        tracing::info!(
            state = assessment.signal.state().as_str(),
            spot = assessment.snapshot.spot(),
            spread = assessment.spread,
            liquidity = assessment.snapshot.liquidity(),
            advisory = ?assessment.advisory,
            "evaluated"
        );
        if !assessment.gaps.is_empty() {
            tracing::warn!(gaps = ?assessment.gaps, "snapshot contains sentinel zeros");
        }

        if let Err(e) = self.publisher.publish_assessment(&assessment).await {
            tracing::warn!("publish_assessment failed: {e:?}");
        }
        Ok(assessment)
    }

    /// Refresh every `period` until `shutdown` resolves. The timer belongs to
    /// the caller's task; `shutdown` is polled during a refresh too, so an
    /// in-flight refresh is dropped rather than awaited.
    pub async fn watch<F>(&self, period: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut tick = tokio::time::interval(period);
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("watch stopped");
                    return;
                }
                _ = async {
                    tick.tick().await;
                    // unavailable was already reported; keep watching
                    let _ = self.refresh().await;
                } => {}
            }
        }
    }
}
