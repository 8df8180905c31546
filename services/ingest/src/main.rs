use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tracing::{error, info};

use ecolingua_core::logging;
use ecolingua_feed::{StatusPublisher, WsServer};
use ecolingua_stream::{Pipeline, ServerInfo};

mod config;
mod handlers;
mod state;

use state::AppState;

const MAX_BODY_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::load(&args)?;
    logging::init_from_config(&config.logging);

    let pipeline = Arc::new(Pipeline::from_config(&config));
    let state = Arc::new(AppState::new(config.clone(), Arc::clone(&pipeline)));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let feed_listener =
        TcpListener::bind((config.server.host.as_str(), config.server.ws_port)).await?;
    let feed = Arc::new(WsServer::new(
        Arc::clone(pipeline.hub()),
        ServerInfo::new(handlers::VERSION, config.feed.status_interval_secs),
    ));
    let feed_task = tokio::spawn(feed.serve(feed_listener));

    let publisher = StatusPublisher::from_config(Arc::clone(&pipeline), &config.feed);
    let publisher_task = tokio::spawn(publisher.run(shutdown_rx));

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!(
        addr = %listener.local_addr()?,
        feed_port = config.server.ws_port,
        store_capacity = config.store.capacity,
        max_subscribers = config.hub.max_subscribers,
        "EcoLingua ingest service listening"
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await?;

    publisher_task.await?;
    if let Err(e) = feed_task.await? {
        error!(error = %e, "WebSocket feed terminated with error");
    }

    info!("EcoLingua ingest service stopped");
    Ok(())
}

pub(crate) fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/sensor-data", post(handlers::ingest_sensor_data))
        .route("/api/status", get(handlers::system_status))
        .route("/api/health", get(handlers::health_check))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(DefaultBodyLimit::max(MAX_BODY_BYTES)))
}

async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
    shutdown_tx.send_replace(true);
}
