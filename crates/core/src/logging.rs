//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins over the configured level. Output is either
//! human-readable text or one JSON object per line.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::CoreError;

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber described by `config`.
///
/// Fails if a global subscriber is already installed.
pub fn try_init(config: &LoggingConfig) -> Result<(), CoreError> {
    let json = config.json.then(|| {
        fmt::layer()
            .json()
            .with_current_span(false)
            .with_target(true)
            .with_thread_ids(true)
    });
    let text = (!config.json).then(|| fmt::layer().with_target(true).with_thread_ids(true));

    tracing_subscriber::registry()
        .with(env_filter(&config.level))
        .with(json)
        .with(text)
        .try_init()
        .map_err(|e| CoreError::Config(format!("logging already initialized: {e}")))
}

/// Install the subscriber from configuration, keeping any existing one.
pub fn init_from_config(config: &LoggingConfig) {
    if try_init(config).is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}

/// Text output at `info` unless `RUST_LOG` says otherwise.
///
/// ```no_run
/// ecolingua_core::logging::init();
/// tracing::info!(store_capacity = 10_000, "Pipeline started");
/// ```
pub fn init() {
    init_from_config(&LoggingConfig::default());
}

/// JSON-lines output for log shippers.
pub fn init_json() {
    init_from_config(&LoggingConfig {
        json: true,
        ..LoggingConfig::default()
    });
}
