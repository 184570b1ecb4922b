//! darkroom — upload JPEG images, apply simple pixel edits, keep every
//! variant.
//!
//! - [`gallery`]: file store, record index, operation set and edit pipeline
//! - [`gateway`]: axum routes and HTML pages
//! - [`config`]: command-line / environment configuration

pub mod config;
pub mod gallery;
pub mod gateway;

pub use config::Config;
pub use gateway::{create_router, AppState};
