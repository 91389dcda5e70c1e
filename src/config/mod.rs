use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{HarvestError, HarvestResult};
use crate::freshness::OrderingPolicy;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub user_agent: String,
    pub concurrency: usize,
    pub fetch_timeout: Duration,
    pub max_retries: u32,
    pub ordering: OrderingPolicy,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> HarvestResult<Self> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok(), exe_dir)
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F, exe_dir: Option<PathBuf>) -> HarvestResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Default db_path is relative to executable directory
        let db_path = lookup("HARVESTER_DB_PATH").unwrap_or_else(|| {
            exe_dir
                .map(|d| d.join("harvester.db").to_string_lossy().into_owned())
                .unwrap_or_else(|| "./harvester.db".to_string())
        });

        let user_agent = lookup("HARVESTER_USER_AGENT")
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        if user_agent.trim().is_empty() {
            return Err(HarvestError::Config(
                "HARVESTER_USER_AGENT must not be empty".to_string(),
            ));
        }

        let concurrency = parse_var(&lookup, "HARVESTER_CONCURRENCY", DEFAULT_CONCURRENCY)?;
        if concurrency == 0 {
            return Err(HarvestError::Config(
                "HARVESTER_CONCURRENCY must be at least 1".to_string(),
            ));
        }

        let timeout_secs = parse_var(
            &lookup,
            "HARVESTER_FETCH_TIMEOUT_SECS",
            DEFAULT_FETCH_TIMEOUT_SECS,
        )?;
        let max_retries = parse_var(&lookup, "HARVESTER_MAX_RETRIES", DEFAULT_MAX_RETRIES)?;

        let ordering = match lookup("HARVESTER_ORDERING") {
            Some(value) => value
                .parse::<OrderingPolicy>()
                .map_err(HarvestError::Config)?,
            None => OrderingPolicy::default(),
        };

        Ok(Self {
            db_path,
            user_agent,
            concurrency,
            fetch_timeout: Duration::from_secs(timeout_secs),
            max_retries,
            ordering,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> HarvestResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| HarvestError::Config(format!("{} has invalid value {:?}", key, raw))),
        None => Ok(default),
    }
}
