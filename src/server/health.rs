//! Health and status endpoints for liveness probes.
//!
//! `/health` returns 200 OK if the server is running; it is intended for
//! load balancers and orchestration systems. `/status` adds a small JSON
//! uptime report for humans checking on the bot.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::AppState;

/// Health check handler.
///
/// Returns 200 OK with the text "OK". This simple endpoint is used to
/// verify that the server is running and accepting connections.
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// The status report served at `/status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub status: &'static str,
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: i64,
}

/// Status handler: since when and for how long the bot has been up.
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusReport> {
    let now = Utc::now();
    Json(StatusReport {
        status: "online",
        started_at: state.started_at,
        uptime_seconds: (now - state.started_at).num_seconds(),
    })
}
