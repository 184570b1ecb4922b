//! Gateway error type.

use crate::gallery::StoreError;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Multipart(e) => e.status(),
            Self::Storage(e) => match e {
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::InvalidName(_) => StatusCode::BAD_REQUEST,
                StoreError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            return (status, "internal server error").into_response();
        }
        (status, self.to_string()).into_response()
    }
}

/// Result type for gateway handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
