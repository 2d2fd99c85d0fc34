//! Server configuration read from environment variables.

use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
/// Tournaments not touched for this long are dropped from memory.
pub const DEFAULT_INACTIVITY_TIMEOUT_SECS: u64 = 12 * 3600;
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 30 * 60;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub inactivity_timeout: Duration,
    pub cleanup_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            inactivity_timeout: Duration::from_secs(DEFAULT_INACTIVITY_TIMEOUT_SECS),
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT`, `INACTIVITY_TIMEOUT_SECS` and `CLEANUP_INTERVAL_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Missing, blank or malformed values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();
        if let Some(host) = value("HOST") {
            config.host = host;
        }
        if let Some(port) = parse_or_warn::<u16>("PORT", value("PORT")) {
            config.port = port;
        }
        if let Some(secs) = parse_or_warn::<u64>("INACTIVITY_TIMEOUT_SECS", value("INACTIVITY_TIMEOUT_SECS")) {
            config.inactivity_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_or_warn::<u64>("CLEANUP_INTERVAL_SECS", value("CLEANUP_INTERVAL_SECS")) {
            if secs > 0 {
                config.cleanup_interval = Duration::from_secs(secs);
            }
        }
        config
    }
}

fn parse_or_warn<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Ignoring malformed {}={:?}, using default", key, raw);
            None
        }
    }
}
