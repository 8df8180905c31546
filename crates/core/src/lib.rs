//! Core functionality for the EcoLingua telemetry pipeline.
//!
//! This crate provides the ambient pieces shared across the workspace:
//! structured logging setup, layered configuration and the core error type.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, FeedConfig, HubConfig, LoggingConfig, ServerConfig, StoreConfig};
pub use error::{CoreError, Result};
