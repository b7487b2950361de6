//! # Web API Module
//!
//! HTTP surface of the booking service. Currently a health endpoint used by
//! load balancers and container probes.

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod handlers;
pub mod response_types;
pub mod routes;
pub mod state;

pub use response_types::HealthResponse;
pub use state::AppState;

/// Create the web application with all routes and middleware
pub fn create_app(state: Arc<AppState>) -> Router {
    let common_middleware = ServiceBuilder::new().layer(TraceLayer::new_for_http());

    let app = Router::new()
        .merge(routes::health_routes())
        .merge(routes::root_routes())
        .layer(common_middleware)
        .with_state(state);

    info!("Web application created with all routes and middleware");
    app
}
