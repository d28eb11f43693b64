//! HTTP handlers for the formdoc API

pub mod documents;
pub mod preview;
pub mod sessions;
pub mod templates;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}
