//! Router assembly for the pipehub HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with CORS
//! and tracing middleware layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax. CORS is permissive (the
/// graph editor frontend calls from its own origin). TraceLayer provides
/// request-level logging via tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/pipelines", get(handlers::pipelines::list_pipelines))
        .route(
            "/pipelines/validate",
            post(handlers::pipelines::validate_pipeline),
        )
        .route("/pipelines/add", post(handlers::pipelines::add_pipeline))
        .route(
            "/pipelines/{uid}",
            get(handlers::pipelines::get_pipeline)
                .delete(handlers::pipelines::delete_pipeline),
        )
        .route(
            "/pipelines/{uid}/image",
            get(handlers::pipelines::pipeline_image),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
