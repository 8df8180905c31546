//! EcoLingua Feed - real-time WebSocket transport
//!
//! Adapts broadcast hub subscriptions to WebSocket connections:
//! - Each connection registers with the hub and receives a welcome message
//! - Hub messages are relayed verbatim as text frames
//! - Connections over the hub's capacity are closed with code 1008
//! - A periodic publisher pushes pipeline status to every subscriber
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use ecolingua_core::Config;
//! use ecolingua_feed::WsServer;
//! use ecolingua_stream::{Pipeline, ServerInfo};
//!
//! # async fn run() -> Result<(), ecolingua_feed::FeedError> {
//! let config = Config::default_config();
//! let pipeline = Arc::new(Pipeline::from_config(&config));
//! let server = Arc::new(WsServer::new(
//!     Arc::clone(pipeline.hub()),
//!     ServerInfo::new(env!("CARGO_PKG_VERSION"), config.feed.status_interval_secs),
//! ));
//! server.run("127.0.0.1:5051".parse().unwrap()).await
//! # }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod publisher;
pub mod websocket;

pub use error::FeedError;
pub use publisher::StatusPublisher;
pub use websocket::WsServer;
