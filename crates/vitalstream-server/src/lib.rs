//! Vitalstream server: REST API and WebSocket streaming for the
//! simulated vitals engine.
//!
//! ## Endpoints
//!
//! - `GET /` - server info
//! - `GET /health` - health check with connection count
//! - `GET /api/v1/subjects` - list the fleet roster
//! - `POST /api/v1/subjects` - register a subject
//! - `GET /api/v1/vitals/status` - scheduler + storage status
//! - `GET /api/v1/vitals/:subject_id` - per-subject history
//! - `POST /api/v1/vitals/cleanup` - manual retention purge
//! - `WS /ws/vitals?subject_id=...` - live reading stream

pub mod dto;
pub mod error;
pub mod handlers;
pub mod state;
pub mod websocket;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::{AppState, SchedulerConfig};

/// Build the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::server_info))
        .route("/health", get(handlers::health))
        .route(
            "/api/v1/subjects",
            get(handlers::list_subjects).post(handlers::register_subject),
        )
        .route("/api/v1/vitals/status", get(handlers::system_status))
        .route("/api/v1/vitals/cleanup", post(handlers::trigger_cleanup))
        .route("/api/v1/vitals/:subject_id", get(handlers::subject_history))
        .route("/ws/vitals", get(websocket::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
