//! Axum router configuration with middleware.
//!
//! Middleware: permissive CORS, request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/status", get(handlers::health::status))
        .route("/transcribe", post(handlers::transcribe::transcribe))
        .route("/enroll", post(handlers::speaker::enroll))
        .route("/diarize", post(handlers::speaker::diarize))
        .route("/detect_intent", post(handlers::intent::detect_intent))
        .route("/add_knowledge", post(handlers::knowledge::add_knowledge))
        .route(
            "/search_knowledge",
            post(handlers::knowledge::search_knowledge),
        )
        .route("/synthesize", post(handlers::synthesize::synthesize))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
