//! Axum-based read endpoint over the event cache.
//!
//! Provides:
//!   GET /client/state         → JSON map id → record (removed events included)
//!   GET /client/state/active  → JSON map id → record (removed events excluded)
//!   GET /health               → JSON cache counts

use crate::cache::EventCache;
use crate::event::EventRecord;
use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// Shared state for the API routes.
#[derive(Clone)]
pub struct ApiState {
    pub cache: EventCache,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub events: usize,
    pub active: usize,
    pub removed: usize,
}

/// Build the Axum router.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/client/state", get(client_state))
        .route("/client/state/active", get(client_state_active))
        .route("/health", get(health))
        .with_state(state)
}

/// Start the API server.
pub async fn serve(state: ApiState, bind_addr: &str) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(addr = bind_addr, "read endpoint listening");
    axum::serve(listener, app).await?;
    Ok(())
}

// --- API Handlers ---

async fn client_state(State(state): State<ApiState>) -> Json<HashMap<String, EventRecord>> {
    Json(state.cache.get_all())
}

async fn client_state_active(
    State(state): State<ApiState>,
) -> Json<HashMap<String, EventRecord>> {
    Json(state.cache.get_active())
}

async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let stats = state.cache.stats();
    Json(HealthResponse {
        status: "ok",
        events: stats.total,
        active: stats.active,
        removed: stats.removed,
    })
}
