// src/snapshot.rs
use crate::types::{MarketReading, RateReading, Snapshot};

/// Field-for-field merge of the two readings. Only reachable with a
/// successful [`MarketReading`], so a `Snapshot` is always complete.
pub struct SnapshotBuilder;

impl SnapshotBuilder {
    pub fn build(market: &MarketReading, rates: RateReading) -> Snapshot {
        Snapshot {
            spot: market.spot_latest(),
            spot_previous: market.spot_previous(),
            spot_history: market.spot_series().to_vec(),
            us_rate: market.us_rate_3m(),
            hk_rate: rates.reference_rate_3m,
            liquidity: rates.liquidity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SpotBar;

    #[test]
    fn copies_every_field() {
        let spot = vec![
            SpotBar { ts_ms: 1, close: 7.8310 },
            SpotBar { ts_ms: 2, close: 7.8300 },
        ];
        let rate = [SpotBar { ts_ms: 2, close: 5.0 }];
        let market = MarketReading::from_series("USDHKD=X", spot.clone(), "^IRX", &rate).unwrap();
        let snap = SnapshotBuilder::build(&market, RateReading { reference_rate_3m: 4.3, liquidity: 15_000.0 });

        assert_eq!(snap.spot(), 7.8300);
        assert_eq!(snap.spot_previous(), 7.8310);
        assert_eq!(snap.spot_history(), spot.as_slice());
        assert_eq!(snap.us_rate(), 5.0);
        assert_eq!(snap.hk_rate(), 4.3);
        assert_eq!(snap.liquidity(), 15_000.0);
        assert!((snap.spread() - 0.7).abs() < 1e-12);
    }
}
