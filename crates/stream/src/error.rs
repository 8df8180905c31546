//! Error types for EcoLingua stream operations.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the broadcast hub to its callers.
#[derive(Debug, Error)]
pub enum HubError {
    /// Subscriber registry is full
    #[error("Subscriber limit reached: {max} subscribers")]
    Capacity {
        /// Configured maximum
        max: usize,
    },

    /// Hub has been shut down and accepts no new subscribers
    #[error("Broadcast hub is shutting down")]
    ShuttingDown,

    /// Message could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Per-subscriber delivery failure. Never surfaced to pipeline callers;
/// the subscriber is pruned instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryFailure {
    /// Receiving side of the channel is gone
    #[error("delivery channel closed")]
    Closed,

    /// Channel stayed full past the send timeout
    #[error("send timed out after {0:?}")]
    TimedOut(Duration),
}
