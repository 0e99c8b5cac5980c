//! Configuration module for the RCL panel core.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default auto-save debounce: 3 seconds of inactivity.
pub const DEFAULT_DEBOUNCE_MS: u64 = 3000;

/// Default view polling fallback interval: 2 seconds.
pub const DEFAULT_POLL_MS: u64 = 2000;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite store file
    pub db_path: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Auto-save debounce interval for editor sessions
    pub debounce: Duration,
    /// Polling fallback interval for view subscribers
    pub poll_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("RCL_DB_PATH")
            .unwrap_or_else(|_| "./data/panel.sqlite".to_string())
            .into();

        let log_level = env::var("RCL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let debounce_ms = env::var("RCL_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_DEBOUNCE_MS);

        let poll_ms = env::var("RCL_POLL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POLL_MS);

        Self {
            db_path,
            log_level,
            debounce: Duration::from_millis(debounce_ms),
            poll_interval: Duration::from_millis(poll_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/panel.sqlite"),
            log_level: "info".to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("RCL_DB_PATH");
        env::remove_var("RCL_LOG_LEVEL");
        env::remove_var("RCL_DEBOUNCE_MS");
        env::remove_var("RCL_POLL_MS");

        let config = Config::from_env();

        assert_eq!(config.db_path, PathBuf::from("./data/panel.sqlite"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.debounce, Duration::from_secs(3));
        assert_eq!(config.poll_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_duration_falls_back() {
        env::set_var("RCL_DEBOUNCE_MS", "not-a-number");
        let config = Config::from_env();
        assert_eq!(config.debounce, Duration::from_millis(DEFAULT_DEBOUNCE_MS));
        env::remove_var("RCL_DEBOUNCE_MS");
    }
}
