//! Pipeline orchestrator
//!
//! Validate -> score -> store -> broadcast. A reading that fails validation
//! is neither stored nor broadcast; a broadcast failure never fails the
//! reading.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ecolingua_core::Config;
use ecolingua_domain::{ReadingValidator, ScoringResult, ValidationError};
use ecolingua_scoring::EnvironmentalScorer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::hub::{BroadcastHub, HubSettings};
use crate::message::FeedMessage;
use crate::store::TelemetryStore;

/// Pipeline counters and resource usage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStatus {
    /// Registered feed subscribers
    pub subscriber_count: usize,
    /// Readings currently retained
    pub stored_readings: usize,
    /// Store capacity
    pub store_capacity: usize,
    /// Health score of the most recent reading
    pub latest_health_score: Option<f64>,
    /// Readings accepted since start
    pub processed_total: u64,
    /// Readings rejected by validation since start
    pub rejected_total: u64,
    /// Messages delivered by the hub
    pub messages_sent: u64,
    /// Failed per-subscriber deliveries
    pub delivery_failures: u64,
}

/// Shared telemetry pipeline.
///
/// `Send + Sync`; share it behind an `Arc` between ingest handlers.
#[derive(Debug)]
pub struct Pipeline {
    validator: ReadingValidator,
    scorer: EnvironmentalScorer,
    store: Arc<TelemetryStore>,
    hub: Arc<BroadcastHub>,
    processed: AtomicU64,
    rejected: AtomicU64,
}

impl Pipeline {
    /// Assemble a pipeline from explicitly constructed parts
    pub fn new(scorer: EnvironmentalScorer, store: Arc<TelemetryStore>, hub: Arc<BroadcastHub>) -> Self {
        Self {
            validator: ReadingValidator::new(),
            scorer,
            store,
            hub,
            processed: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    /// Build store and hub from configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            EnvironmentalScorer::new(),
            Arc::new(TelemetryStore::new(config.store.capacity)),
            Arc::new(BroadcastHub::with_settings(HubSettings::from(&config.hub))),
        )
    }

    /// Run one raw payload through the pipeline.
    pub async fn process(&self, payload: &Value) -> Result<ScoringResult, ValidationError> {
        let reading = match self.validator.validate(payload) {
            Ok(reading) => reading,
            Err(e) => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                warn!(field = e.field().unwrap_or("payload"), error = %e, "Reading rejected");
                return Err(e);
            }
        };

        let result = self.scorer.score(&reading);
        let reading_id = reading.id();
        self.store.append(reading, result.clone());

        match self.hub.broadcast(&FeedMessage::sensor_data(result.clone())).await {
            Ok(report) if !report.pruned.is_empty() => {
                warn!(
                    reading_id = %reading_id,
                    pruned = report.pruned.len(),
                    "Broadcast pruned unresponsive subscribers"
                );
            }
            Ok(_) => {}
            Err(e) => warn!(reading_id = %reading_id, error = %e, "Broadcast failed"),
        }

        self.processed.fetch_add(1, Ordering::Relaxed);
        info!(
            reading_id = %reading_id,
            health_score = result.health_score,
            threat_level = ?result.threat_assessment.overall_level,
            "Reading processed"
        );

        Ok(result)
    }

    /// Current counters
    pub fn status(&self) -> PipelineStatus {
        let hub = self.hub.stats();
        PipelineStatus {
            subscriber_count: hub.active_subscribers,
            stored_readings: self.store.len(),
            store_capacity: self.store.capacity(),
            latest_health_score: self.store.latest().map(|r| r.result.health_score),
            processed_total: self.processed.load(Ordering::Relaxed),
            rejected_total: self.rejected.load(Ordering::Relaxed),
            messages_sent: hub.messages_sent,
            delivery_failures: hub.delivery_failures,
        }
    }

    /// Telemetry history
    pub fn store(&self) -> &Arc<TelemetryStore> {
        &self.store
    }

    /// Subscriber hub
    pub fn hub(&self) -> &Arc<BroadcastHub> {
        &self.hub
    }
}
