//! # Health Check Handlers
//!
//! Liveness endpoint for load balancers and container probes.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use tracing::debug;

use crate::constants::HealthStatus;
use crate::web::response_types::HealthResponse;
use crate::web::state::AppState;

/// Basic health check endpoint: GET /api/v1/health
///
/// Reports that the process is up along with its name and version. It does
/// not probe the queue or the database.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        service: state.app_name.clone(),
        version: state.app_version.clone(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
