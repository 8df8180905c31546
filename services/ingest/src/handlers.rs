use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::state::AppState;

pub const SERVICE_NAME: &str = "ecolingua-ingest";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn ingest_sensor_data(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected sensor data body");
            return (
                rejection.status(),
                Json(json!({
                    "status": "error",
                    "error": {
                        "field": null,
                        "value": null,
                        "allowedRange": null,
                        "message": rejection.body_text(),
                    },
                })),
            );
        }
    };

    match state.pipeline.process(&payload).await {
        Ok(result) => {
            debug!(reading_id = %result.reading_id, "Sensor data accepted");
            (
                StatusCode::OK,
                Json(json!({
                    "status": "success",
                    "message": "Sensor data processed successfully",
                    "readingId": result.reading_id,
                    "timestamp": result.timestamp,
                    "analysis": result,
                })),
            )
        }
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "status": "error",
                "error": e.report(),
            })),
        ),
    }
}

pub async fn system_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    let pipeline = state.pipeline.status();
    Json(json!({
        "status": "operational",
        "version": VERSION,
        "timestamp": Utc::now().to_rfc3339(),
        "feedPort": state.config.server.ws_port,
        "dataStorage": format!("{}/{}", pipeline.stored_readings, pipeline.store_capacity),
        "pipeline": pipeline,
    }))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": VERSION,
        "timestamp": Utc::now().to_rfc3339(),
        "metrics": {
            "activeConnections": state.pipeline.hub().subscriber_count(),
            "dataPointsStored": state.pipeline.store().len(),
        },
    }))
}
