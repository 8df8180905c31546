//! EcoLingua Stream
//!
//! The telemetry pipeline proper: bounded history, subscriber fan-out and the
//! orchestrator that ties validation, scoring, storage and broadcast together.

#![warn(missing_docs)]

pub mod error;
pub mod hub;
pub mod message;
pub mod pipeline;
pub mod store;

pub use error::{DeliveryFailure, HubError};
pub use hub::{BroadcastHub, BroadcastReport, HubSettings, HubStats, SubscriberId, SubscriberInfo, Subscription};
pub use message::{FeedMessage, ServerInfo};
pub use pipeline::{Pipeline, PipelineStatus};
pub use store::{TelemetryRecord, TelemetryStore};
