//! Axum router construction for the Observer API.
//!
//! Assembles all routes (commands, queries, `WebSocket`) into a single
//! [`Router`] with CORS middleware enabled for cross-origin dashboard
//! access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- HTML dashboard
/// - `GET /ws` -- `WebSocket` snapshot stream
/// - `POST /api/simulation/start` / `stop` / `reset` -- lifecycle
/// - `POST /api/mission/create` -- create a mission
/// - `GET /api/state` -- full world snapshot
/// - `GET /api/metrics` -- aggregate metrics
/// - `GET /api/agent/{id}` / `PUT /api/agent/{id}` -- single agent
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Dashboard
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws", get(ws::ws_observe))
        // Lifecycle commands
        .route("/api/simulation/start", post(handlers::start_simulation))
        .route("/api/simulation/stop", post(handlers::stop_simulation))
        .route("/api/simulation/reset", post(handlers::reset_simulation))
        // World commands and queries
        .route("/api/mission/create", post(handlers::create_mission))
        .route("/api/state", get(handlers::get_state))
        .route("/api/metrics", get(handlers::get_metrics))
        .route(
            "/api/agent/{id}",
            get(handlers::get_agent).put(handlers::put_agent),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
