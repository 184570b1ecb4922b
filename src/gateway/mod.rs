//! HTTP gateway: routes, shared state and server startup.

pub mod error;
pub mod handlers;
pub mod pages;

use crate::gallery::{BackgroundRemover, EditPipeline, FileStore, ImageIndex};
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};

/// Application state shared across handlers. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FileStore>,
    pub index: Arc<ImageIndex>,
    pub pipeline: Arc<EditPipeline>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        store: FileStore,
        index: ImageIndex,
        remover: Arc<dyn BackgroundRemover>,
        max_upload_bytes: usize,
    ) -> Self {
        let store = Arc::new(store);
        let index = Arc::new(index);
        let pipeline = Arc::new(EditPipeline::new(store.clone(), index.clone(), remover));
        Self {
            store,
            index,
            pipeline,
            max_upload_bytes,
        }
    }
}

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/", get(handlers::list_images))
        .route("/upload", post(handlers::upload_image))
        .route(
            "/edit/{id}",
            get(handlers::edit_form).post(handlers::edit_image),
        )
        .route("/delete/{id}", post(handlers::delete_image))
        .route("/download/{filename}", get(handlers::download_image))
        .route("/health", get(handlers::health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(addr = %listener.local_addr()?, "Gateway listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Gateway server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
