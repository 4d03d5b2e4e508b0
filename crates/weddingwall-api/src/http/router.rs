//! Axum router configuration with middleware.
//!
//! Paths match what the LINE console and the kiosk page are configured with,
//! so they live at `/api/...` without a version prefix. Each is also
//! reachable with a trailing slash.
//! Middleware: CORS, request tracing, body size limit.

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Largest webhook body accepted (LINE batches are a few KB).
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let linebot = get(handlers::linebot::webhook_health).post(handlers::linebot::receive_webhook);
    let photo_slide = get(handlers::photo_slide::next_slide);

    Router::new()
        .route("/api/linebot", linebot.clone())
        .route("/api/linebot/", linebot)
        .route("/api/photo_slide", photo_slide.clone())
        .route("/api/photo_slide/", photo_slide)
        .route("/health", get(health_check))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Process health check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
