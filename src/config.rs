use clap::Parser;
use std::net::SocketAddr;

use crate::gallery::removebg::DEFAULT_ENDPOINT;

/// darkroom — upload JPEGs, apply simple edits, keep every variant.
#[derive(Parser, Debug, Clone)]
#[command(name = "darkroom", version, about, long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "DARKROOM_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// SQLite database (`sqlite://` prefix optional, `:memory:` allowed)
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://darkroom.db")]
    pub database_url: String,

    /// Directory holding uploaded and edited images
    #[arg(long, env = "DARKROOM_UPLOAD_DIR", default_value = "static/uploads")]
    pub upload_dir: String,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "DARKROOM_MAX_UPLOAD_BYTES", default_value_t = 32 * 1024 * 1024)]
    pub max_upload_bytes: usize,

    /// API key for the background-removal service
    #[arg(long, env = "REMOVEBG_API_KEY", hide_env_values = true)]
    pub removebg_api_key: Option<String>,

    /// Background-removal endpoint
    #[arg(long, env = "REMOVEBG_URL", default_value = DEFAULT_ENDPOINT)]
    pub removebg_url: String,
}

impl Config {
    /// Filesystem path of the SQLite database named by `database_url`.
    pub fn sqlite_path(&self) -> &str {
        let url = self.database_url.as_str();
        url.strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url)
    }
}
