use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers;
use crate::state::AppState;

/// All routes with CORS, request tracing and a body limit.
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/summarize", post(handlers::summarize::summarize_handler))
        .route("/chat", post(handlers::chat::chat_handler))
        .route("/save_summary", post(handlers::summaries::save_summary_handler))
        .route("/summaries", get(handlers::summaries::list_summaries_handler))
        .route(
            "/preferences/{user_id}",
            get(handlers::preferences::get_preferences_handler)
                .put(handlers::preferences::update_preferences_handler),
        )
        .with_state(state)
        // CORS (the browser extension calls from its own origin)
        .layer(CorsLayer::permissive())
        // Tracing
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
}
