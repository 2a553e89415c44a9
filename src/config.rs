// src/config.rs
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// User thresholds for one evaluation. Supplied by whatever drives the
/// monitor (CLI flags, config file, a UI) and never mutated by the core.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "d_spread_threshold")]     pub spread_threshold: f64,    // percentage points
    #[serde(default = "d_liquidity_threshold")]  pub liquidity_threshold: f64, // HKD millions
}
fn d_spread_threshold() -> f64 { 0.50 }
fn d_liquidity_threshold() -> f64 { 10_000.0 }

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self { spread_threshold: d_spread_threshold(), liquidity_threshold: d_liquidity_threshold() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HkmaConfig {
    #[serde(default = "d_hkma_base")]     pub base_url: String,
    #[serde(default = "d_timeout_ms")]    pub timeout_ms: u64,
    #[serde(default = "d_user_agent")]    pub user_agent: String,
}
fn d_hkma_base() -> String { "https://api.hkma.gov.hk/public/market-data-and-statistics".into() }
fn d_timeout_ms() -> u64 { 5_000 }
fn d_user_agent() -> String { "Mozilla/5.0".into() }

impl Default for HkmaConfig {
    fn default() -> Self {
        Self { base_url: d_hkma_base(), timeout_ms: d_timeout_ms(), user_agent: d_user_agent() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    #[serde(default = "d_market_base")]   pub base_url: String,
    #[serde(default = "d_spot_symbol")]   pub spot_symbol: String,
    #[serde(default = "d_spot_range")]    pub spot_range: String,
    #[serde(default = "d_rate_symbol")]   pub rate_symbol: String,
    #[serde(default = "d_rate_range")]    pub rate_range: String,
    #[serde(default = "d_interval")]      pub interval: String,
    #[serde(default = "d_timeout_ms")]    pub timeout_ms: u64,
    #[serde(default = "d_user_agent")]    pub user_agent: String,
}
fn d_market_base() -> String { "https://query1.finance.yahoo.com".into() }
fn d_spot_symbol() -> String { "USDHKD=X".into() }
fn d_spot_range() -> String { "1mo".into() }
fn d_rate_symbol() -> String { "^IRX".into() } // 13-week T-bill yield
fn d_rate_range() -> String { "5d".into() }
fn d_interval() -> String { "1d".into() }

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: d_market_base(),
            spot_symbol: d_spot_symbol(),
            spot_range: d_spot_range(),
            rate_symbol: d_rate_symbol(),
            rate_range: d_rate_range(),
            interval: d_interval(),
            timeout_ms: d_timeout_ms(),
            user_agent: d_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)] pub thresholds: ThresholdConfig,
    #[serde(default)] pub hkma: HkmaConfig,
    #[serde(default)] pub market: MarketConfig,
}

impl MonitorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: MonitorConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        if !t.spread_threshold.is_finite() || !t.liquidity_threshold.is_finite() {
            return Err(ConfigError::Invalid("thresholds must be finite"));
        }
        if self.hkma.timeout_ms == 0 || self.market.timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeouts must be non-zero"));
        }
        Ok(())
    }
}

#[inline]
pub fn ms(d: u64) -> Duration { Duration::from_millis(d) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = MonitorConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.thresholds, ThresholdConfig { spread_threshold: 0.5, liquidity_threshold: 10_000.0 });
        assert_eq!(cfg.hkma.timeout_ms, 5_000);
        assert_eq!(cfg.market.spot_symbol, "USDHKD=X");
        assert_eq!(cfg.market.rate_symbol, "^IRX");
        assert_eq!(cfg.market.rate_range, "5d");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = MonitorConfig::from_toml_str(
            r#"
            [thresholds]
            spread_threshold = 0.75

            [hkma]
            timeout_ms = 2500
            "#,
        )
        .unwrap();
        assert_eq!(cfg.thresholds.spread_threshold, 0.75);
        assert_eq!(cfg.thresholds.liquidity_threshold, 10_000.0);
        assert_eq!(cfg.hkma.timeout_ms, 2_500);
        assert!(cfg.hkma.base_url.starts_with("https://api.hkma.gov.hk"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = MonitorConfig::from_toml_str("[market]\ntimeout_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_toml_is_parse_error() {
        assert!(matches!(
            MonitorConfig::from_toml_str("[thresholds\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
