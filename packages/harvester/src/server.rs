//! HTTP surface for the job list page.
//!
//! Every request re-reads the store, so a finished `update` run shows up on
//! the next page load without restarting the server.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::HarvesterConfig;
use crate::error::Result;
use crate::html::PageRenderer;
use crate::store::load_snapshot;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<HarvesterConfig>,
    pub renderer: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(config: HarvesterConfig, renderer: PageRenderer) -> Self {
        Self {
            config: Arc::new(config),
            renderer: Arc::new(renderer),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_jobs))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn list_jobs(State(state): State<AppState>) -> std::result::Result<Html<String>, StatusCode> {
    let rendered = tokio::task::spawn_blocking(move || {
        let path = &state.config.store_path;
        let snapshot = load_snapshot(path);
        let exists = snapshot.exists();
        if !exists {
            tracing::warn!(
                path = %path.display(),
                "Jobs data file not found; run the update command to populate it"
            );
        }
        state.renderer.render(&snapshot.into_listings(), exists)
    })
    .await;

    match rendered {
        Ok(Ok(html)) => Ok(Html(html)),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Failed to render job list");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
        Err(e) => {
            tracing::error!(error = %e, "Render task failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

/// Serve the job list page on `config.bind_addr` until Ctrl-C.
pub async fn serve(config: HarvesterConfig) -> Result<()> {
    let addr = config.bind_addr;
    let state = AppState::new(config, PageRenderer::new()?);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Serving job listings");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
