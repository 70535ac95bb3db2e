use crate::decode::MappingFormat;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {0}: {1}")]
    InvalidEnv(String, String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Upstream base URL, e.g. "http://localhost:3000"
    #[serde(default = "default_feed_url")]
    pub base_url: String,
    /// Path of the event feed document
    #[serde(default = "default_state_path")]
    pub state_path: String,
    /// Path of the id → name mapping document
    #[serde(default = "default_mappings_path")]
    pub mappings_path: String,
    /// Crawl interval in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Mapping table layout served by upstream.
    #[serde(default)]
    pub mapping_format: MappingFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Serve the read endpoint.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_feed_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_state_path() -> String {
    "/api/state".to_string()
}
fn default_mappings_path() -> String {
    "/api/mappings".to_string()
}
fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_request_timeout_ms() -> u64 {
    5000
}
fn default_true() -> bool {
    true
}
fn default_bind() -> String {
    "0.0.0.0:3001".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_feed_url(),
            state_path: default_state_path(),
            mappings_path: default_mappings_path(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            mapping_format: MappingFormat::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: default_bind(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Config {
    /// Load config from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&contents)?;
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Defaults plus environment overrides (no file needed).
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = std::env::var("SCOREFEED_FEED_URL") {
            self.feed.base_url = url;
        }
        if let Ok(bind) = std::env::var("SCOREFEED_BIND") {
            self.server.bind = bind;
        }
        if let Ok(raw) = std::env::var("SCOREFEED_POLL_INTERVAL_MS") {
            self.feed.poll_interval_ms = raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidEnv("SCOREFEED_POLL_INTERVAL_MS".to_string(), raw))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.feed.base_url, "http://localhost:3000");
        assert_eq!(config.feed.state_path, "/api/state");
        assert_eq!(config.feed.mappings_path, "/api/mappings");
        assert_eq!(config.feed.poll_interval_ms, 1000);
        assert_eq!(config.feed.mapping_format, MappingFormat::Canonical);
        assert!(config.server.enabled);
        assert_eq!(config.server.bind, "0.0.0.0:3001");
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml(
            r#"
            [feed]
            base_url = "http://feed.internal:8080"
            poll_interval_ms = 250
            mapping_format = "lines"

            [logging]
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.feed.base_url, "http://feed.internal:8080");
        assert_eq!(config.feed.poll_interval_ms, 250);
        assert_eq!(config.feed.mapping_format, MappingFormat::Lines);
        assert_eq!(config.feed.request_timeout_ms, 5000);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.server.bind, "0.0.0.0:3001");
    }

    #[test]
    fn test_empty_toml() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.feed.poll_interval_ms, 1000);
    }

    #[test]
    fn test_bad_mapping_format_rejected() {
        let result = Config::from_toml("[feed]\nmapping_format = \"csv\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
