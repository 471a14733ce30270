use anyhow::Context;
use std::{net::SocketAddr, path::PathBuf, time::Duration};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Portfolios valued when a request names none
    pub portfolio_ids: Vec<u32>,
    /// `None` leaves request ranges unbounded
    pub max_range_days: Option<u32>,
    pub seed_dir: PathBuf,
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Parses a comma-separated list of portfolio ids such as `1,2`.
pub fn parse_portfolio_ids(value: &str) -> anyhow::Result<Vec<u32>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .with_context(|| format!("Invalid portfolio id '{}'", s))
        })
        .collect()
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = var_or("VL_LISTEN_ADDR", "0.0.0.0:8000")
            .parse()
            .context("Invalid VL_LISTEN_ADDR")?;
        let db_path = var_or("VL_DB_PATH", "./db/app.db");
        let cors_allow = var_or("VL_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = var_or("VL_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .context("Invalid VL_REQUEST_TIMEOUT_MS")?;
        let portfolio_ids = parse_portfolio_ids(&var_or("VL_PORTFOLIO_IDS", "1,2"))
            .context("Invalid VL_PORTFOLIO_IDS")?;
        if portfolio_ids.is_empty() {
            anyhow::bail!("VL_PORTFOLIO_IDS must name at least one portfolio");
        }
        let max_range_days: u32 = var_or("VL_MAX_RANGE_DAYS", "3660")
            .parse()
            .context("Invalid VL_MAX_RANGE_DAYS")?;
        let seed_dir = PathBuf::from(var_or("VL_SEED_DIR", "./resources"));

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            portfolio_ids,
            max_range_days: (max_range_days > 0).then_some(max_range_days),
            seed_dir,
        })
    }
}
