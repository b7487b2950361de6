//! Route definitions for the web API

use std::sync::Arc;

use axum::response::Redirect;
use axum::routing::get;
use axum::Router;

use crate::web::{handlers, state::AppState};

pub const HEALTH_PATH: &str = "/api/v1/health";

/// Health check routes for monitoring and container probes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route(HEALTH_PATH, get(handlers::health::health_check))
}

/// `GET /` points clients at the health endpoint
pub fn root_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(|| async { Redirect::temporary(HEALTH_PATH) }))
}
