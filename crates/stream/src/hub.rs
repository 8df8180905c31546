//! Bounded broadcast hub
//!
//! Owns a capacity-limited registry of subscribers. Each subscriber gets a
//! bounded channel of pre-serialized messages; the transport layer holds the
//! receiving half. A broadcast pass:
//!
//! 1. serializes the message once,
//! 2. snapshots the registry (no lock is held while sending),
//! 3. sends to every snapshotted subscriber concurrently, each send bounded
//!    by the configured timeout,
//! 4. prunes the subscribers whose send failed, after the whole pass.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use ecolingua_core::HubConfig;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DeliveryFailure, HubError};

/// Unique subscriber identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Handle returned on registration; the transport reads from `receiver`.
#[derive(Debug)]
pub struct Subscription {
    /// Identifier to pass to [`BroadcastHub::unregister`]
    pub id: SubscriberId,
    /// Serialized messages addressed to this subscriber
    pub receiver: mpsc::Receiver<Arc<str>>,
}

/// Hub limits
#[derive(Debug, Clone, PartialEq)]
pub struct HubSettings {
    /// Maximum concurrently registered subscribers
    pub max_subscribers: usize,
    /// Upper bound on one per-subscriber send
    pub send_timeout: Duration,
    /// Queue depth of each delivery channel
    pub channel_depth: usize,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self::from(&HubConfig::default())
    }
}

impl From<&HubConfig> for HubSettings {
    fn from(config: &HubConfig) -> Self {
        Self {
            max_subscribers: config.max_subscribers,
            send_timeout: Duration::from_millis(config.send_timeout_ms),
            channel_depth: config.channel_depth.max(1),
        }
    }
}

#[derive(Debug)]
struct Subscriber {
    sender: mpsc::Sender<Arc<str>>,
    registered_at: DateTime<Utc>,
    messages_sent: Arc<AtomicU64>,
}

/// Point-in-time view of one subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberInfo {
    /// Subscriber identifier
    pub id: SubscriberId,
    /// Registration time
    pub registered_at: DateTime<Utc>,
    /// Messages delivered to this subscriber
    pub messages_sent: u64,
}

#[derive(Debug, Default)]
struct HubCounters {
    total_registrations: AtomicU64,
    rejected_registrations: AtomicU64,
    messages_sent: AtomicU64,
    delivery_failures: AtomicU64,
}

/// Hub-wide counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubStats {
    /// Currently registered subscribers
    pub active_subscribers: usize,
    /// Successful registrations since start
    pub total_registrations: u64,
    /// Registrations refused for capacity or shutdown
    pub rejected_registrations: u64,
    /// Messages delivered across all subscribers
    pub messages_sent: u64,
    /// Failed per-subscriber sends
    pub delivery_failures: u64,
}

/// Outcome of one broadcast pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Subscribers in the snapshot
    pub attempted: usize,
    /// Successful deliveries
    pub delivered: usize,
    /// Subscribers this pass removed because their delivery failed
    pub pruned: Vec<SubscriberId>,
}

/// Capacity-limited fan-out of serialized messages.
#[derive(Debug)]
pub struct BroadcastHub {
    subscribers: RwLock<HashMap<SubscriberId, Subscriber>>,
    settings: HubSettings,
    counters: HubCounters,
    shutdown_tx: watch::Sender<bool>,
}

impl BroadcastHub {
    /// Create a hub with default limits (500 subscribers, 1s send timeout)
    pub fn new() -> Self {
        Self::with_settings(HubSettings::default())
    }

    /// Create a hub with custom limits
    pub fn with_settings(settings: HubSettings) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            subscribers: RwLock::new(HashMap::new()),
            settings,
            counters: HubCounters::default(),
            shutdown_tx,
        }
    }

    /// Register a new subscriber.
    ///
    /// Fails with [`HubError::Capacity`] when the registry is full; nothing is
    /// registered in that case.
    pub fn register(&self) -> Result<Subscription, HubError> {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if *self.shutdown_tx.borrow() {
            self.counters
                .rejected_registrations
                .fetch_add(1, Ordering::Relaxed);
            return Err(HubError::ShuttingDown);
        }

        if subscribers.len() >= self.settings.max_subscribers {
            self.counters
                .rejected_registrations
                .fetch_add(1, Ordering::Relaxed);
            warn!(
                max = self.settings.max_subscribers,
                "Subscriber registration rejected: capacity reached"
            );
            return Err(HubError::Capacity {
                max: self.settings.max_subscribers,
            });
        }

        let mut id = SubscriberId::generate();
        while subscribers.contains_key(&id) {
            id = SubscriberId::generate();
        }

        let (sender, receiver) = mpsc::channel(self.settings.channel_depth);
        subscribers.insert(
            id,
            Subscriber {
                sender,
                registered_at: Utc::now(),
                messages_sent: Arc::new(AtomicU64::new(0)),
            },
        );
        self.counters
            .total_registrations
            .fetch_add(1, Ordering::Relaxed);

        info!(subscriber_id = %id, active = subscribers.len(), "Subscriber registered");
        Ok(Subscription { id, receiver })
    }

    /// Remove a subscriber. Unknown or already-removed ids are a no-op.
    ///
    /// Returns whether a subscriber was actually removed.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let removed = subscribers.remove(&id).is_some();
        if removed {
            info!(subscriber_id = %id, active = subscribers.len(), "Subscriber unregistered");
        }
        removed
    }

    /// Deliver `message` to every subscriber registered when the pass begins.
    ///
    /// Failing subscribers are pruned after the pass; a failure never cuts the
    /// pass short.
    pub async fn broadcast<M>(&self, message: &M) -> Result<BroadcastReport, HubError>
    where
        M: Serialize + ?Sized,
    {
        let payload: Arc<str> = Arc::from(serde_json::to_string(message)?);

        let targets: Vec<(SubscriberId, mpsc::Sender<Arc<str>>, Arc<AtomicU64>)> = {
            let subscribers = self
                .subscribers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            subscribers
                .iter()
                .map(|(id, s)| (*id, s.sender.clone(), Arc::clone(&s.messages_sent)))
                .collect()
        };

        if targets.is_empty() {
            return Ok(BroadcastReport::default());
        }

        let send_timeout = self.settings.send_timeout;
        let sends = targets.into_iter().map(|(id, sender, sent)| {
            let payload = Arc::clone(&payload);
            async move {
                let outcome = match tokio::time::timeout(send_timeout, sender.send(payload)).await {
                    Ok(Ok(())) => {
                        sent.fetch_add(1, Ordering::Relaxed);
                        Ok(())
                    }
                    Ok(Err(_)) => Err(DeliveryFailure::Closed),
                    Err(_) => Err(DeliveryFailure::TimedOut(send_timeout)),
                };
                (id, outcome)
            }
        });
        let outcomes = join_all(sends).await;

        let mut report = BroadcastReport {
            attempted: outcomes.len(),
            ..Default::default()
        };
        let mut failed = Vec::new();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(()) => report.delivered += 1,
                Err(failure) => {
                    warn!(subscriber_id = %id, error = %failure, "Delivery failed");
                    failed.push(id);
                }
            }
        }

        self.counters
            .messages_sent
            .fetch_add(report.delivered as u64, Ordering::Relaxed);
        self.counters
            .delivery_failures
            .fetch_add(failed.len() as u64, Ordering::Relaxed);

        // Subscribers that unregistered during the pass are already gone
        report.pruned = failed.into_iter().filter(|id| self.unregister(*id)).collect();

        debug!(
            attempted = report.attempted,
            delivered = report.delivered,
            pruned = report.pruned.len(),
            "Broadcast pass complete"
        );
        Ok(report)
    }

    /// Stop accepting subscribers and release every registered one.
    ///
    /// Dropping the senders closes each delivery channel, which is how
    /// transports learn the hub is gone.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);

        let released = {
            let mut subscribers = self
                .subscribers
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let count = subscribers.len();
            subscribers.clear();
            count
        };

        info!(released, "Broadcast hub shut down");
    }

    /// Whether [`shutdown`](Self::shutdown) has been called
    pub fn is_shut_down(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// Receiver that flips to `true` on shutdown, for long-lived loops
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether `id` is currently registered
    pub fn is_registered(&self, id: SubscriberId) -> bool {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id)
    }

    /// Per-subscriber view for observability
    pub fn subscriber_info(&self) -> Vec<SubscriberInfo> {
        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers
            .iter()
            .map(|(id, s)| SubscriberInfo {
                id: *id,
                registered_at: s.registered_at,
                messages_sent: s.messages_sent.load(Ordering::Relaxed),
            })
            .collect()
    }

    /// Hub-wide counters
    pub fn stats(&self) -> HubStats {
        HubStats {
            active_subscribers: self.subscriber_count(),
            total_registrations: self.counters.total_registrations.load(Ordering::Relaxed),
            rejected_registrations: self.counters.rejected_registrations.load(Ordering::Relaxed),
            messages_sent: self.counters.messages_sent.load(Ordering::Relaxed),
            delivery_failures: self.counters.delivery_failures.load(Ordering::Relaxed),
        }
    }

    /// Configured limits
    pub fn settings(&self) -> &HubSettings {
        &self.settings
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}
