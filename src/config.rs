use std::env;
use std::time::Duration;

pub const DEFAULT_PROVIDER_URL: &str = "https://provider.code-challenge.feverup.com/api/events";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub provider_url: String,
    pub provider_timeout_secs: u64,
    pub sync_interval_secs: u64,
    /// Postgres backing when set, in-memory store otherwise.
    pub database_url: Option<String>,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable numbers fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let config = Self {
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            provider_url: lookup("PROVIDER_URL")
                .unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string()),
            provider_timeout_secs: lookup("PROVIDER_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            sync_interval_secs: lookup("SYNC_INTERVAL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            database_url: lookup("DATABASE_URL").filter(|v| !v.is_empty()),
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        if config.sync_interval_secs == 0 {
            anyhow::bail!("SYNC_INTERVAL_SECS must be greater than zero");
        }

        Ok(config)
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }
}
