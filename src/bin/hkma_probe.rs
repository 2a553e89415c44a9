// src/bin/hkma_probe.rs
//
// Runs both HKMA queries and prints each outcome before the merge, so a
// silent fallback can be traced to its cause.
use pegwatch::config::HkmaConfig;
use pegwatch::providers::hkma::{merge_rate_reading, HkmaRates};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let mut cfg = HkmaConfig::default();
    if let Some(base) = std::env::args().nth(1) {
        cfg.base_url = base;
    }
    let hkma = HkmaRates::from_config(&cfg)?;

    let (liq, hibor) = tokio::join!(hkma.query_liquidity(), hkma.query_hibor_3m());
    match &liq {
        Ok(r) => println!("liquidity: balance={} hibor_1m={}", r.closing_balance, r.hibor_1m),
        Err(e) => println!("liquidity: failed [{}] {e}", e.kind()),
    }
    match &hibor {
        Ok(v) => println!("hibor_3m:  {v}"),
        Err(e) => println!("hibor_3m:  failed [{}] {e}", e.kind()),
    }
    let r = merge_rate_reading(&liq, &hibor);
    println!("-> reference_rate_3m={} liquidity={}", r.reference_rate_3m, r.liquidity);
    Ok(())
}
