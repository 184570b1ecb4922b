use super::codec::{self, ImageOpError};
use super::index::ImageIndex;
use super::naming::derived_filename;
use super::ops::{Operation, Transform};
use super::removebg::BackgroundRemover;
use super::schema::ImageRecord;
use super::storage::FileStore;
use anyhow::{Context, Result};
use image::RgbImage;
use std::sync::Arc;

/// Turns a source record plus selected operations into one derived record.
///
/// Every selected operation is applied to the original file, never to the
/// previous step's output, and only the last operation's outcome is kept.
/// The derived file is nevertheless labelled with the first operation's
/// name: `["blur", "sharpen"]` yields `edited_blur_<source>` holding the
/// sharpened original.
pub struct EditPipeline {
    store: Arc<FileStore>,
    index: Arc<ImageIndex>,
    remover: Arc<dyn BackgroundRemover>,
}

impl EditPipeline {
    pub fn new(
        store: Arc<FileStore>,
        index: Arc<ImageIndex>,
        remover: Arc<dyn BackgroundRemover>,
    ) -> Self {
        Self {
            store,
            index,
            remover,
        }
    }

    /// Parse submitted option names in order, skipping unknown ones.
    pub fn parse_options<S: AsRef<str>>(names: &[S]) -> Vec<Operation> {
        names
            .iter()
            .filter_map(|name| match name.as_ref().parse() {
                Ok(op) => Some(op),
                Err(e) => {
                    tracing::debug!(error = %e, "Ignoring edit option");
                    None
                }
            })
            .collect()
    }

    /// Run the selected operations against `source`.
    ///
    /// Returns the new record, or `None` when the last operation produced no
    /// image (or nothing was selected). Operation failures are logged and
    /// count as "no image"; storage and index failures are errors.
    pub async fn run(
        &self,
        source: &ImageRecord,
        options: &[Operation],
    ) -> Result<Option<ImageRecord>> {
        let Some(first) = options.first() else {
            return Ok(None);
        };

        let mut edited: Option<RgbImage> = None;
        for op in options {
            edited = self.apply(source, *op).await;
        }

        let Some(image) = edited else {
            tracing::info!(
                source_id = source.id,
                filename = %source.filename,
                "Edit produced no image"
            );
            return Ok(None);
        };

        let bytes = tokio::task::spawn_blocking(move || codec::encode_jpeg(&image))
            .await
            .context("Encoder task failed")??;

        let edited_name = derived_filename(first.name(), &source.filename);
        self.store
            .save(&edited_name, &bytes)
            .await
            .context("Failed to write edited image")?;
        let record = self.index.insert(&edited_name)?;

        tracing::info!(
            source_id = source.id,
            id = record.id,
            filename = %record.filename,
            "Stored edited image"
        );
        Ok(Some(record))
    }

    async fn apply(&self, source: &ImageRecord, op: Operation) -> Option<RgbImage> {
        match op.local_transform() {
            Some(transform) => self.apply_local(source, op, transform).await,
            None => self.remove_background(source).await,
        }
    }

    async fn apply_local(
        &self,
        source: &ImageRecord,
        op: Operation,
        transform: Transform,
    ) -> Option<RgbImage> {
        let bytes = match self.store.read(&source.filename).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(op = %op, error = %e, "Cannot read source image");
                return None;
            }
        };

        let result = tokio::task::spawn_blocking(move || -> Result<RgbImage, ImageOpError> {
            let img = codec::decode(&bytes)?;
            Ok(transform(&img))
        })
        .await;

        match result {
            Ok(Ok(img)) => Some(img),
            Ok(Err(e)) => {
                tracing::warn!(op = %op, filename = %source.filename, error = %e, "Edit failed");
                None
            }
            Err(e) => {
                tracing::error!(op = %op, error = %e, "Edit task panicked");
                None
            }
        }
    }

    /// Send the original file to the remover, keep its raw answer next to
    /// the source as `edited_removeBackground_<source>` and decode it.
    async fn remove_background(&self, source: &ImageRecord) -> Option<RgbImage> {
        let original = match self.store.read(&source.filename).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot read source image for background removal");
                return None;
            }
        };

        let processed = match self
            .remover
            .remove_background(original, &source.filename)
            .await
        {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(filename = %source.filename, error = %e, "Background removal failed");
                return None;
            }
        };

        let raw_name = derived_filename(Operation::RemoveBackground.name(), &source.filename);
        if let Err(e) = self.store.save(&raw_name, &processed).await {
            tracing::warn!(filename = %raw_name, error = %e, "Cannot store background removal result");
            return None;
        }
        let stored = match self.store.read(&raw_name).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(filename = %raw_name, error = %e, "Cannot re-read background removal result");
                return None;
            }
        };

        match tokio::task::spawn_blocking(move || codec::decode(&stored)).await {
            Ok(Ok(img)) => Some(img),
            Ok(Err(e)) => {
                tracing::warn!(filename = %raw_name, error = %e, "Background removal result is not an image");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "Decode task panicked");
                None
            }
        }
    }
}
