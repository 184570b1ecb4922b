use serde::{Deserialize, Serialize};

/// One stored image file, either an upload or a derived edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: i64,
    /// Name of the file inside the file store. Not unique.
    pub filename: String,
}

/// Paginated list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageListResponse {
    pub images: Vec<ImageRecord>,
    pub total: usize,
    pub offset: usize,
    /// `None` means the listing was not limited.
    pub limit: Option<usize>,
}
