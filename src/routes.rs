use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Build the main application router
pub fn app_router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // POST /manage
        .merge(crate::api::routes::manage_routes::manage_routes())
        // Fallback handler for 404
        .fallback(handler_404)
        .layer(TraceLayer::new_for_http())
}

/// Router with shared state attached, ready to serve
pub fn build_app(state: AppState) -> Router {
    app_router().with_state(state)
}

// Handler for health check
async fn health_check() -> &'static str {
    "OK"
}

// Handler for 404 Not Found
async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}
