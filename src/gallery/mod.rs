//! Gallery — image storage, record index and the edit pipeline.
//!
//! Handles upload storage on disk, the SQLite record table, the fixed
//! operation set and the pipeline that turns a source image plus selected
//! operations into a new derived record.

pub mod codec;
pub mod filters;
pub mod index;
pub mod naming;
pub mod ops;
pub mod pipeline;
pub mod removebg;
pub mod schema;
pub mod storage;

pub use index::ImageIndex;
pub use ops::Operation;
pub use pipeline::EditPipeline;
pub use removebg::{BackgroundRemover, RemoveBgClient, RemoveBgError};
pub use schema::{ImageListResponse, ImageRecord};
pub use storage::{FileStore, StoreError};
