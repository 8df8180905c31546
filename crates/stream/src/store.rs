//! Bounded telemetry history
//!
//! An append-only ring buffer of (reading, result) pairs, oldest first. When
//! full, the head is evicted under the same lock as the insert.

use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock};

use ecolingua_domain::{Reading, ScoringResult};
use serde::Serialize;

/// One stored pipeline run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryRecord {
    /// Validated reading
    pub reading: Reading,
    /// Assessment derived from the reading
    pub result: ScoringResult,
}

/// Process-wide bounded history of readings.
#[derive(Debug)]
pub struct TelemetryStore {
    records: RwLock<VecDeque<Arc<TelemetryRecord>>>,
    capacity: usize,
}

impl TelemetryStore {
    /// Default number of retained readings
    pub const DEFAULT_CAPACITY: usize = 10_000;

    /// Create a store holding at most `capacity` records (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: RwLock::new(VecDeque::with_capacity(capacity.min(4096))),
            capacity,
        }
    }

    /// Append at the tail, evicting the oldest record when full.
    ///
    /// Returns the evicted record, if any.
    pub fn append(&self, reading: Reading, result: ScoringResult) -> Option<Arc<TelemetryRecord>> {
        let record = Arc::new(TelemetryRecord { reading, result });
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);

        let evicted = if records.len() >= self.capacity {
            records.pop_front()
        } else {
            None
        };
        records.push_back(record);
        evicted
    }

    /// Copy of the buffer, oldest first
    pub fn snapshot(&self) -> Vec<Arc<TelemetryRecord>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.iter().cloned().collect()
    }

    /// Most recently appended record
    pub fn latest(&self) -> Option<Arc<TelemetryRecord>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.back().cloned()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been stored yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of stored records
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for TelemetryStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
