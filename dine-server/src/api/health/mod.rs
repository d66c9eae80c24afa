//! Health check
//!
//! ```json
//! {"status": "ok", "version": "0.1.0", "environment": "development",
//!  "lateThresholdMinutes": 15, "relayTenants": 2}
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    /// Kitchen displays flag tickets older than this as late
    late_threshold_minutes: i64,
    /// Tenants with an open relay channel
    relay_tenants: usize,
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        late_threshold_minutes: state.config.late_threshold_minutes,
        relay_tenants: state.hub().tenant_count(),
    })
}
