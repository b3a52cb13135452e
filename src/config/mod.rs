use std::{fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::identity::DEFAULT_PROBE_TIMEOUT;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub store_path: PathBuf,
    pub identity_timeout: Duration,
}

impl Config {
    /// `.env` first, then the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("POLL_API_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| {
                info!("POLL_API_URL not set, using default: {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_string()
            })
            .trim_end_matches('/')
            .to_string();

        let store_path = lookup("POLL_STORE_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_store_path);

        let timeout_ms = try_load(
            &lookup,
            "POLL_IDENTITY_TIMEOUT_MS",
            DEFAULT_PROBE_TIMEOUT.as_millis() as u64,
        );

        Self {
            api_url,
            store_path,
            identity_timeout: Duration::from_millis(timeout_ms),
        }
    }
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("chhetra-poll").join("votes"))
        .unwrap_or_else(|| PathBuf::from("chhetra-poll-votes"))
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
    }
}
