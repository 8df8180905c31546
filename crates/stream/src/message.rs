//! Feed messages pushed to subscribers
//!
//! Tagged by `type` on the wire, e.g.
//! `{"type":"sensor_data_update","data":{...}}`.

use chrono::{DateTime, Utc};
use ecolingua_domain::ScoringResult;
use serde::{Deserialize, Serialize};

use crate::hub::SubscriberId;
use crate::pipeline::PipelineStatus;

/// Capabilities advertised in the welcome message
pub const CAPABILITIES: [&str; 4] = [
    "real_time_sensor_data",
    "ai_analysis_results",
    "threat_alerts",
    "system_status",
];

/// Server description sent to every new connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    /// Crate version of the serving process
    pub version: String,
    /// Message families the feed carries
    pub capabilities: Vec<String>,
    /// Period of `system_status_update` messages
    pub update_interval_secs: u64,
}

impl ServerInfo {
    /// Server info with the standard capability list
    pub fn new(version: impl Into<String>, update_interval_secs: u64) -> Self {
        Self {
            version: version.into(),
            capabilities: CAPABILITIES.iter().map(|c| c.to_string()).collect(),
            update_interval_secs,
        }
    }
}

/// Every message a feed subscriber can receive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedMessage {
    /// Welcome, sent only to the new connection
    ConnectionEstablished {
        /// Hub identifier of the connection
        #[serde(rename = "clientId")]
        client_id: SubscriberId,
        /// Time of registration
        timestamp: DateTime<Utc>,
        /// Server description
        #[serde(rename = "serverInfo")]
        server_info: ServerInfo,
    },

    /// One processed reading
    SensorDataUpdate {
        /// Assessment of the reading
        data: Box<ScoringResult>,
    },

    /// Periodic pipeline status
    SystemStatusUpdate {
        /// Time the status was sampled
        timestamp: DateTime<Utc>,
        /// Pipeline counters
        data: PipelineStatus,
    },
}

impl FeedMessage {
    /// Welcome for a freshly registered subscriber
    pub fn welcome(client_id: SubscriberId, server_info: ServerInfo) -> Self {
        Self::ConnectionEstablished {
            client_id,
            timestamp: Utc::now(),
            server_info,
        }
    }

    /// Wrap a scoring result for broadcast
    pub fn sensor_data(result: ScoringResult) -> Self {
        Self::SensorDataUpdate {
            data: Box::new(result),
        }
    }

    /// Status update stamped with the current time
    pub fn system_status(status: PipelineStatus) -> Self {
        Self::SystemStatusUpdate {
            timestamp: Utc::now(),
            data: status,
        }
    }

    /// Wire tag of this message
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionEstablished { .. } => "connection_established",
            Self::SensorDataUpdate { .. } => "sensor_data_update",
            Self::SystemStatusUpdate { .. } => "system_status_update",
        }
    }
}
