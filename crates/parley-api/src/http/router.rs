//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS (restricted to `server.allowed_origins`), tracing.

use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(&state.config.server.allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/sessions",
            get(handlers::session::list_sessions).post(handlers::session::save_session),
        )
        .route(
            "/sessions/{id}",
            get(handlers::session::get_session).delete(handlers::session::delete_session),
        )
        .route("/stats", get(handlers::stats::get_statistics));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `"*"` anywhere in the list allows any origin. Entries that are not valid
/// header values are skipped.
fn allowed_origins(origins: &[String]) -> AllowOrigin {
    if origins.iter().any(|o| o == "*") {
        return AllowOrigin::any();
    }

    let values: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    AllowOrigin::list(values)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
