use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod shortcode;
pub mod store;

use shortcode::ShortCodes;
use store::MappingStore;

// ── Shared application state ───────────────────────────────────────────────

/// Built once in `main` and handed to the router; never mutated afterwards.
pub struct AppState {
    pub store: Arc<dyn MappingStore>,
    pub codes: ShortCodes,
}

impl AppState {
    pub fn new(store: Arc<dyn MappingStore>, codes: ShortCodes) -> Self {
        Self { store, codes }
    }
}

// ── Router ─────────────────────────────────────────────────────────────────

/// POST / creates a mapping, GET /:shortURL resolves one. Any other verb on
/// either path is answered with 405 before a handler (or the store) runs.
/// HEAD is routed explicitly: axum would otherwise serve it with the GET handler.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/",
            post(handlers::create::create).fallback(handlers::method_not_allowed),
        )
        // Short-code lookup; the static /health route wins over the capture
        .route(
            "/:shortURL",
            get(handlers::resolve::resolve)
                .head(handlers::method_not_allowed)
                .fallback(handlers::method_not_allowed),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
