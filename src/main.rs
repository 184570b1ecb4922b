use anyhow::{Context, Result};
use clap::Parser;
use darkroom::gallery::{FileStore, ImageIndex, RemoveBgClient};
use darkroom::{gateway, AppState, Config};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    let config = Config::parse();
    tracing::info!("darkroom v{}", env!("CARGO_PKG_VERSION"));

    let store = FileStore::open(&config.upload_dir)
        .await
        .context("failed to open upload directory")?;
    tracing::info!(dir = %store.base_dir().display(), "File store ready");

    let index = ImageIndex::open(config.sqlite_path()).context("failed to open database")?;

    let remover = RemoveBgClient::new(config.removebg_url.clone(), config.removebg_api_key.clone());
    if !remover.is_configured() {
        tracing::warn!("REMOVEBG_API_KEY not set; removeBackground edits will produce no image");
    }

    let state = AppState::new(store, index, Arc::new(remover), config.max_upload_bytes);
    gateway::serve(config.bind, state).await
}
