//! End-to-end pipeline behaviour across store, hub and scorer.

use std::sync::Arc;
use std::time::Duration;

use ecolingua_domain::{HealthTier, ThreatKind, ThreatLevel};
use ecolingua_scoring::{EnvironmentalScorer, FixedJitter};
use ecolingua_stream::{
    BroadcastHub, FeedMessage, HubError, HubSettings, Pipeline, TelemetryStore,
};
use futures_util::future::join_all;
use serde_json::json;

fn pipeline_with(capacity: usize, settings: HubSettings) -> Pipeline {
    Pipeline::new(
        EnvironmentalScorer::with_jitter(Arc::new(FixedJitter::MIDPOINT)),
        Arc::new(TelemetryStore::new(capacity)),
        Arc::new(BroadcastHub::with_settings(settings)),
    )
}

fn quick_settings(max_subscribers: usize) -> HubSettings {
    HubSettings {
        max_subscribers,
        send_timeout: Duration::from_millis(50),
        channel_depth: 16,
    }
}

#[tokio::test]
async fn ideal_reading_end_to_end() {
    let pipeline = pipeline_with(100, quick_settings(10));
    let mut sub = pipeline.hub().register().unwrap();

    let result = pipeline
        .process(&json!({"temperature": 22, "humidity": 60, "pm25": 10, "co2": 400}))
        .await
        .unwrap();

    assert_eq!(result.health_score, 98.0);
    assert_eq!(result.health_tier, HealthTier::Optimal);
    assert_eq!(
        result.recommendations,
        vec!["Environmental conditions are within optimal ranges - maintain current practices"]
    );

    let raw = sub.receiver.recv().await.unwrap();
    let wire: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(wire["type"], "sensor_data_update");
    assert_eq!(wire["data"]["readingId"], result.reading_id.to_string());
    assert_eq!(wire["data"]["healthScore"], 98.0);
}

#[tokio::test]
async fn hazardous_reading_triggers_emergency() {
    let pipeline = pipeline_with(100, quick_settings(10));

    let result = pipeline
        .process(&json!({"temperature": 45, "pm25": 200, "co2": 600}))
        .await
        .unwrap();

    let threats = &result.threat_assessment;
    assert_eq!(threats.overall_level, ThreatLevel::High);
    assert!(threats.emergency_response_needed);
    let kinds: Vec<ThreatKind> = threats.active_threats.iter().map(|t| t.kind).collect();
    assert!(kinds.contains(&ThreatKind::ExtremeTemperature));
    assert!(kinds.contains(&ThreatKind::AirPollution));
}

#[tokio::test]
async fn invalid_reading_is_reported_and_dropped() {
    let pipeline = pipeline_with(100, quick_settings(10));
    let mut sub = pipeline.hub().register().unwrap();

    let err = pipeline
        .process(&json!({"temperature": 22, "humidity": 150}))
        .await
        .unwrap_err();

    let report = serde_json::to_value(&err).unwrap();
    assert_eq!(report["field"], "humidity");
    assert_eq!(report["value"], 150.0);
    assert_eq!(report["allowedRange"]["min"], 0.0);
    assert_eq!(report["allowedRange"]["max"], 100.0);

    assert!(pipeline.store().is_empty());
    assert!(sub.receiver.try_recv().is_err());
}

#[tokio::test]
async fn store_keeps_only_the_newest_readings() {
    let pipeline = pipeline_with(3, quick_settings(10));

    for t in 1..=5 {
        pipeline.process(&json!({"temperature": t})).await.unwrap();
    }

    let temps: Vec<f64> = pipeline
        .store()
        .snapshot()
        .iter()
        .map(|r| r.reading.temperature().unwrap())
        .collect();
    assert_eq!(temps, vec![3.0, 4.0, 5.0]);
    assert_eq!(pipeline.status().processed_total, 5);
    assert_eq!(pipeline.status().stored_readings, 3);
}

#[tokio::test]
async fn hub_capacity_frees_up_after_unregister() {
    let pipeline = pipeline_with(10, quick_settings(2));
    let hub = pipeline.hub();

    let a = hub.register().unwrap();
    let _b = hub.register().unwrap();
    assert!(matches!(hub.register(), Err(HubError::Capacity { max: 2 })));

    hub.unregister(a.id);
    assert!(hub.register().is_ok());
}

#[tokio::test]
async fn one_closed_subscriber_among_three() {
    let pipeline = pipeline_with(10, quick_settings(10));
    let hub = Arc::clone(pipeline.hub());

    let mut a = hub.register().unwrap();
    let b = hub.register().unwrap();
    let mut c = hub.register().unwrap();
    let closed_id = b.id;
    drop(b);

    pipeline.process(&json!({"temperature": 20})).await.unwrap();

    assert!(a.receiver.recv().await.is_some());
    assert!(c.receiver.recv().await.is_some());
    assert_eq!(hub.subscriber_count(), 2);
    assert!(!hub.is_registered(closed_id));

    let stats = hub.stats();
    assert_eq!(stats.messages_sent, 2);
    assert_eq!(stats.delivery_failures, 1);
}

#[tokio::test]
async fn concurrent_producers() {
    let pipeline = Arc::new(pipeline_with(1_000, quick_settings(10)));
    let mut sub = pipeline.hub().register().unwrap();

    let mut handles = Vec::new();
    for worker in 0..8 {
        let pipeline = Arc::clone(&pipeline);
        handles.push(tokio::spawn(async move {
            for i in 0..10 {
                let t = (worker * 10 + i) as f64 / 4.0;
                pipeline.process(&json!({"temperature": t})).await.unwrap();
            }
        }));
    }

    let mut received = 0;
    let drain = async {
        while received < 80 {
            if sub.receiver.recv().await.is_none() {
                break;
            }
            received += 1;
        }
    };
    let (results, ()) = tokio::join!(join_all(handles), drain);
    assert!(results.into_iter().all(|r| r.is_ok()));

    assert_eq!(received, 80);
    assert_eq!(pipeline.store().len(), 80);
    assert_eq!(pipeline.status().processed_total, 80);
}

#[tokio::test]
async fn status_message_reflects_pipeline() {
    let pipeline = pipeline_with(10, quick_settings(10));
    pipeline.process(&json!({})).await.unwrap();
    let _ = pipeline.process(&json!("not an object")).await;

    let msg = FeedMessage::system_status(pipeline.status());
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["type"], "system_status_update");
    assert_eq!(json["data"]["processedTotal"], 1);
    assert_eq!(json["data"]["rejectedTotal"], 1);
    assert_eq!(json["data"]["latestHealthScore"], 95.0);
}

#[tokio::test]
async fn shutdown_closes_feed_channels() {
    let pipeline = pipeline_with(10, quick_settings(10));
    let mut sub = pipeline.hub().register().unwrap();

    pipeline.hub().shutdown();

    assert!(sub.receiver.recv().await.is_none());
    assert!(pipeline.process(&json!({"temperature": 21})).await.is_ok());
    assert_eq!(pipeline.status().subscriber_count, 0);
}
