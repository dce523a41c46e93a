//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS; the gateway in front restricts origins.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Program grid
        .route(
            "/programs",
            get(handlers::list_programs).post(handlers::create_programs),
        )
        .route("/programs/grid", get(handlers::weekly_grid))
        .route("/programs/conflicts", post(handlers::detect_conflicts))
        .route("/programs/resolve", post(handlers::resolve_conflicts))
        .route(
            "/programs/{id}",
            put(handlers::update_program).delete(handlers::delete_program),
        )
        // Run-sheets
        .route(
            "/conducteurs",
            get(handlers::list_conducteurs).post(handlers::create_conducteur),
        )
        .route(
            "/conducteurs/{id}",
            get(handlers::get_conducteur)
                .put(handlers::save_conducteur)
                .delete(handlers::delete_conducteur),
        )
        .route(
            "/conducteurs/{id}/validate",
            post(handlers::validate_conducteur),
        )
        .route("/conducteurs/{id}/reject", post(handlers::reject_conducteur))
        // Notifications
        .route("/notifications", get(handlers::list_notifications))
        .route(
            "/notifications/{id}/read",
            post(handlers::mark_notification_read),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
