use crate::{RoomCommand, RoomManager, ServerConfig, SignalingService, ws_handler};
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub rooms: usize,
    pub members: usize,
    pub connections: usize,
}

/// Wires a [`SignalingService`] to a freshly spawned [`RoomManager`] task.
pub fn spawn_coordinator(command_capacity: usize) -> (SignalingService, JoinHandle<()>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<RoomCommand>(command_capacity);
    let signaling = SignalingService::new(cmd_tx);

    let manager = RoomManager::new(Arc::new(signaling.clone()));
    let handle = tokio::spawn(manager.run(cmd_rx));

    (signaling, handle)
}

pub fn router(signaling: SignalingService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(|| async { "ok" }))
        .route("/stats", get(stats_handler))
        .layer(cors)
        .with_state(signaling)
}

async fn stats_handler(
    State(service): State<SignalingService>,
) -> Result<Json<StatsResponse>, StatusCode> {
    let (reply, rx) = oneshot::channel();
    service
        .submit(RoomCommand::Stats { reply })
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;
    let stats = rx.await.map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;

    Ok(Json(StatsResponse {
        rooms: stats.rooms,
        members: stats.members,
        connections: service.connection_count(),
    }))
}

/// Runs the relay until `shutdown` resolves.
pub async fn serve<F>(config: ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (signaling, coordinator) = spawn_coordinator(config.command_capacity);
    let app = router(signaling);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("Signaling server listening on ws://{}/ws", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    coordinator.abort();
    info!("Signaling server stopped");
    Ok(())
}
