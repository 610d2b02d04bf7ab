use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};
use familyfolio_core::settings::RebalanceSettings;
use rust_decimal::Decimal;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub portfolio_file: PathBuf,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub settings: RebalanceSettings,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("FF_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8088".to_string())
            .parse()
            .context("Invalid FF_LISTEN_ADDR")?;
        let portfolio_file = std::env::var("FF_PORTFOLIO_FILE")
            .unwrap_or_else(|_| "./data/portfolios.json".into())
            .into();
        let cors_allow = std::env::var("FF_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("FF_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);

        let mut settings = RebalanceSettings::default();
        if let Some(threshold) = decimal_var("FF_DEFAULT_THRESHOLD")? {
            settings.default_threshold = threshold;
        }
        if let Some(cutoff) = decimal_var("FF_HIGH_PRIORITY_DEVIATION")? {
            settings.high_priority_deviation = cutoff;
        }
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid rebalance settings: {}", e))?;

        Ok(Self {
            listen_addr,
            portfolio_file,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            settings,
        })
    }
}

fn decimal_var(key: &str) -> anyhow::Result<Option<Decimal>> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => Decimal::from_str(raw.trim())
            .map(Some)
            .with_context(|| format!("Invalid {}: {}", key, raw)),
        _ => Ok(None),
    }
}
