//! Request handlers.

use super::error::{ApiError, ApiResult};
use super::pages;
use super::AppState;
use crate::gallery::naming::{allowed_file, guess_mime_type, legacy_edited_filename, secure_filename};
use crate::gallery::EditPipeline;
use axum::body::{Body, Bytes};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use maud::Markup;
use serde::Deserialize;
use tokio_util::io::ReaderStream;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub offset: usize,
    pub limit: Option<usize>,
}

/// `GET /`
pub async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Markup> {
    let list = state.index.list(query.offset, query.limit)?;
    Ok(pages::index_page(&list))
}

/// `POST /upload`
///
/// Validation failures (no `file` field, empty name, wrong extension) all
/// redirect back to the listing without a message.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Redirect> {
    let back = Redirect::to("/");

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await?;
            upload = Some((filename, data));
            break;
        }
    }

    let Some((original_name, data)) = upload else {
        tracing::debug!("Upload without a file field");
        return Ok(back);
    };
    if original_name.is_empty() || !allowed_file(&original_name) {
        tracing::debug!(filename = %original_name, "Rejected upload");
        return Ok(back);
    }

    let filename = secure_filename(&original_name);
    if !allowed_file(&filename) {
        tracing::debug!(filename = %original_name, "Upload name empty after sanitizing");
        return Ok(back);
    }

    state.store.save(&filename, &data).await?;
    let record = state.index.insert(&filename)?;
    tracing::info!(id = record.id, filename = %record.filename, bytes = data.len(), "Stored upload");

    Ok(back)
}

/// `GET /edit/{id}`
pub async fn edit_form(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Markup> {
    let image = state
        .index
        .get(id)?
        .ok_or_else(|| ApiError::NotFound(format!("image {id}")))?;
    Ok(pages::edit_page(&image))
}

/// `POST /edit/{id}`
///
/// Reads repeated `options` fields in submission order. Redirects to the
/// listing when a new image was stored, otherwise shows the form again.
pub async fn edit_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> ApiResult<Response> {
    let image = state
        .index
        .get(id)?
        .ok_or_else(|| ApiError::NotFound(format!("image {id}")))?;

    let selected: Vec<String> = url::form_urlencoded::parse(&body)
        .filter(|(key, _)| key == "options")
        .map(|(_, value)| value.into_owned())
        .collect();
    let options = EditPipeline::parse_options(selected.as_slice());

    match state.pipeline.run(&image, &options).await? {
        Some(_) => Ok(Redirect::to("/").into_response()),
        None => Ok(pages::edit_page(&image).into_response()),
    }
}

/// `POST /delete/{id}`
///
/// Removes the file, a guessed `edited_<filename>` variant and the row. A
/// missing record is a silent no-op.
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Redirect> {
    if let Some(image) = state.index.get(id)? {
        for name in [image.filename.clone(), legacy_edited_filename(&image.filename)] {
            if let Err(e) = state.store.delete(&name).await {
                tracing::warn!(filename = %name, error = %e, "Failed to remove image file");
            }
        }
        state.index.delete(id)?;
        tracing::info!(id, filename = %image.filename, "Deleted image");
    }
    Ok(Redirect::to("/"))
}

/// `GET /download/{filename}`
pub async fn download_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let file = state.store.open_read(&filename).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        filename.replace(['"', '\r', '\n'], "_")
    );
    Ok((
        [
            (header::CONTENT_TYPE, guess_mime_type(&filename).to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}

/// `GET /health`
pub async fn health_check() -> &'static str {
    "ok"
}
