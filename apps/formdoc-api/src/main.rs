//! Formdoc API Server - Backend for template-driven document generation
//!
//! Provides REST endpoints for:
//! - Template schema delivery
//! - Owner-scoped document lifecycle (draft -> generated)
//! - Multi-step editing sessions with autosave
//! - Live render/validate preview

use anyhow::Result;
use formdoc_api::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("formdoc_api=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    // Initialize application state
    info!("Initializing Formdoc API...");
    let state = Arc::new(AppState::new().await?);

    let app = formdoc_api::router(state);

    // Parse bind address
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3002);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting Formdoc API on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
