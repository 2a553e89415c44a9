// src/bin/peg_monitor.rs
use clap::Parser;
use pegwatch::{
    config::MonitorConfig,
    monitor::PegMonitor,
    providers::{hkma::HkmaRates, yahoo::YahooMarket},
    publishing::StdoutPublisher,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "peg_monitor", about = "USD/HKD peg, rate spread and liquidity signal")]
struct Args {
    /// TOML config file (falls back to $PEGWATCH_CONFIG, then built-in defaults)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Spread threshold in percentage points
    #[arg(long)]
    spread_threshold: Option<f64>,
    /// Liquidity threshold in HKD millions
    #[arg(long)]
    liquidity_threshold: Option<f64>,
    /// Re-evaluate every N seconds until interrupted
    #[arg(long)]
    watch: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let path = args.config.clone().or_else(|| std::env::var_os("PEGWATCH_CONFIG").map(PathBuf::from));
    let mut cfg = match path {
        Some(p) => MonitorConfig::load(&p)?,
        None => MonitorConfig::default(),
    };
    if let Some(v) = args.spread_threshold {
        cfg.thresholds.spread_threshold = v;
    }
    if let Some(v) = args.liquidity_threshold {
        cfg.thresholds.liquidity_threshold = v;
    }
    cfg.validate()?;

    let rates = Arc::new(HkmaRates::from_config(&cfg.hkma)?);
    let market = Arc::new(YahooMarket::from_config(&cfg.market)?);
    let monitor = PegMonitor::new(cfg.thresholds, StdoutPublisher, rates, market);

    let Some(secs) = args.watch else {
        monitor.refresh().await?;
        return Ok(());
    };

    monitor
        .watch(Duration::from_secs(secs.max(1)), async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;
    Ok(())
}
