//! Configuration management for EcoLingua.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `ECOLINGUA_*` environment overrides.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub hub: HubConfig,
    pub feed: FeedConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub ws_port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of readings retained in memory
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub max_subscribers: usize,
    /// Upper bound on a single per-subscriber send
    pub send_timeout_ms: u64,
    /// Queue depth of each subscriber's delivery channel
    pub channel_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub status_interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5050,
            ws_port: 5051,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { capacity: 10_000 }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_subscribers: 500,
            send_timeout_ms: 1_000,
            channel_depth: 64,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            status_interval_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            level: "info".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            hub: HubConfig::default(),
            feed: FeedConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Apply `ECOLINGUA_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup, e.g. a map in tests.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ECOLINGUA_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("ECOLINGUA_PORT") {
            self.server.port = parse_var("ECOLINGUA_PORT", &v)?;
        }
        if let Some(v) = lookup("ECOLINGUA_WS_PORT") {
            self.server.ws_port = parse_var("ECOLINGUA_WS_PORT", &v)?;
        }
        if let Some(v) = lookup("ECOLINGUA_STORE_CAPACITY") {
            self.store.capacity = parse_var("ECOLINGUA_STORE_CAPACITY", &v)?;
        }
        if let Some(v) = lookup("ECOLINGUA_MAX_SUBSCRIBERS") {
            self.hub.max_subscribers = parse_var("ECOLINGUA_MAX_SUBSCRIBERS", &v)?;
        }
        if let Some(v) = lookup("ECOLINGUA_LOG_JSON") {
            self.logging.json = parse_var("ECOLINGUA_LOG_JSON", &v)?;
        }
        if let Some(v) = lookup("ECOLINGUA_LOG_LEVEL") {
            self.logging.level = v;
        }
        Ok(())
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.store.capacity == 0 {
            return Err(CoreError::Config("store.capacity must be > 0".into()));
        }
        if self.hub.max_subscribers == 0 {
            return Err(CoreError::Config("hub.max_subscribers must be > 0".into()));
        }
        if self.hub.send_timeout_ms == 0 {
            return Err(CoreError::Config("hub.send_timeout_ms must be > 0".into()));
        }
        if self.hub.channel_depth == 0 {
            return Err(CoreError::Config("hub.channel_depth must be > 0".into()));
        }
        if self.feed.status_interval_secs == 0 {
            return Err(CoreError::Config(
                "feed.status_interval_secs must be > 0".into(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CoreError::Config(format!("{key}: cannot parse {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_pipeline_limits() {
        let config = Config::default_config();
        assert_eq!(config.store.capacity, 10_000);
        assert_eq!(config.hub.max_subscribers, 500);
        assert_eq!(config.feed.status_interval_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [store]
            capacity = 25

            [hub]
            max_subscribers = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.store.capacity, 25);
        assert_eq!(config.hub.max_subscribers, 3);
        assert_eq!(config.hub.send_timeout_ms, 1_000);
        assert_eq!(config.server.port, 5050);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ECOLINGUA_PORT", "8090"),
            ("ECOLINGUA_STORE_CAPACITY", "42"),
            ("ECOLINGUA_LOG_JSON", "true"),
            ("ECOLINGUA_LOG_LEVEL", "ecolingua_stream=debug"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default_config();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 8090);
        assert_eq!(config.store.capacity, 42);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "ecolingua_stream=debug");
    }

    #[test]
    fn test_bad_override_is_rejected() {
        let mut config = Config::default_config();
        let err = config
            .apply_overrides(|key| (key == "ECOLINGUA_PORT").then(|| "not-a-port".to_string()))
            .unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_zero_capacity_invalid() {
        let mut config = Config::default_config();
        config.store.capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("ecolingua_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[server]\nport = 7000\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.server.port, 7000);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let path = std::env::temp_dir().join(format!("ecolingua_missing_{}.toml", uuid::Uuid::new_v4()));
        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }

    #[test]
    fn test_from_file_bad_toml() {
        let path = std::env::temp_dir().join(format!("ecolingua_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[server\nport = \"x\"\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, CoreError::Toml(_)));

        let _ = std::fs::remove_file(&path);
    }
}
