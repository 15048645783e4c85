use anyhow::{Result, anyhow};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub bind_addr: String,
    pub seed_csv_path: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Numeric values that fail to parse
    /// fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|val| !val.trim().is_empty())
            .ok_or_else(|| anyhow!("Failed to determine DATABASE_URL from environment variables"))?;

        let max_connections = lookup("MAX_CONNECTIONS")
            .and_then(|val| val.parse::<u32>().ok())
            .filter(|val| *val > 0)
            .unwrap_or(15);

        let acquire_timeout = Duration::from_secs(
            lookup("ACQUIRE_TIMEOUT_SECS")
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(5),
        );

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:5001".to_string());

        let seed_csv_path = PathBuf::from(
            lookup("SEED_CSV_PATH").unwrap_or_else(|| "/data/covid_data.csv".to_string()),
        );

        Ok(Self {
            database_url,
            max_connections,
            acquire_timeout,
            bind_addr,
            seed_csv_path,
        })
    }
}
