//! Periodic pipeline status broadcasts.

use std::sync::Arc;
use std::time::Duration;

use ecolingua_core::FeedConfig;
use ecolingua_stream::{FeedMessage, Pipeline};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Broadcasts `system_status_update` on a fixed interval.
///
/// When the shutdown signal fires the publisher shuts the hub down, which
/// closes every open feed connection.
#[derive(Debug)]
pub struct StatusPublisher {
    pipeline: Arc<Pipeline>,
    interval: Duration,
}

impl StatusPublisher {
    /// Publish every `interval` (minimum one millisecond)
    pub fn new(pipeline: Arc<Pipeline>, interval: Duration) -> Self {
        Self {
            pipeline,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Publish every `status_interval_secs`
    pub fn from_config(pipeline: Arc<Pipeline>, config: &FeedConfig) -> Self {
        Self::new(pipeline, Duration::from_secs(config.status_interval_secs))
    }

    /// Run until `shutdown` turns true or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately
        ticker.tick().await;

        info!(interval = ?self.interval, "Status publisher started");

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => self.publish().await,
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        self.pipeline.hub().shutdown();
        info!("Status publisher stopped");
    }

    async fn publish(&self) {
        let message = FeedMessage::system_status(self.pipeline.status());
        match self.pipeline.hub().broadcast(&message).await {
            Ok(report) => debug!(
                delivered = report.delivered,
                pruned = report.pruned.len(),
                "Status update published"
            ),
            Err(e) => warn!(error = %e, "Status update failed"),
        }
    }
}
