//! Formdoc API — template-driven document generation backend
//!
//! Exposes the template schema, the multi-step form engine, and the
//! document lifecycle over REST. Identity arrives as an opaque
//! `X-User-Id` header from the fronting auth layer; every document
//! route is owner-scoped.

pub mod artifacts;
pub mod auth;
pub mod autosave;
pub mod error;
pub mod handlers;
pub mod models;
pub mod sessions;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build the full application router
pub fn router(state: Arc<AppState>) -> Router {
    // CORS configuration for web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Template schema (read-only)
        .route("/api/templates/:id", get(handlers::templates::get_template))
        // Document lifecycle
        .route(
            "/api/documents",
            post(handlers::documents::create_document).get(handlers::documents::list_documents),
        )
        .route(
            "/api/documents/:id",
            get(handlers::documents::get_document)
                .patch(handlers::documents::update_document)
                .delete(handlers::documents::delete_document),
        )
        .route(
            "/api/documents/:id/export",
            post(handlers::documents::export_document),
        )
        // Live preview (no persistence, no auth)
        .route("/api/preview", post(handlers::preview::preview))
        // Editing sessions (multi-step form state + autosave)
        .route("/api/sessions", post(handlers::sessions::open_session))
        .route(
            "/api/sessions/:id",
            get(handlers::sessions::get_session).delete(handlers::sessions::close_session),
        )
        .route("/api/sessions/:id/next", post(handlers::sessions::next_step))
        .route("/api/sessions/:id/back", post(handlers::sessions::back_step))
        .route("/api/sessions/:id/goto", post(handlers::sessions::goto_step))
        // Exported artifacts
        .nest_service("/artifacts", ServeDir::new(state.artifacts_dir.clone()))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
