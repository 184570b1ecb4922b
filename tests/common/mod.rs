//! Gateway test utilities.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use darkroom::gallery::codec;
use darkroom::gallery::{BackgroundRemover, FileStore, ImageIndex, RemoveBgError};
use darkroom::{create_router, AppState};
use image::{Rgb, RgbImage};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "darkroom-test-boundary";

/// Background remover that always answers with the given status.
pub struct FailingRemover(pub u16);

#[async_trait]
impl BackgroundRemover for FailingRemover {
    async fn remove_background(
        &self,
        _image: Vec<u8>,
        _filename: &str,
    ) -> Result<Vec<u8>, RemoveBgError> {
        Err(RemoveBgError::Status {
            status: self.0,
            body: "mock failure".into(),
        })
    }
}

/// A router over a temporary upload directory and in-memory database.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_remover(Arc::new(FailingRemover(500))).await
    }

    pub async fn with_remover(remover: Arc<dyn BackgroundRemover>) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let upload_dir = temp_dir.path().join("uploads");
        let store = FileStore::open(upload_dir.to_str().unwrap())
            .await
            .expect("Failed to open file store");
        let index = ImageIndex::in_memory().expect("Failed to open index");
        let state = AppState::new(store, index, remover, 8 * 1024 * 1024);
        Self {
            router: create_router(state.clone()),
            state,
            _temp_dir: temp_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn upload(&self, filename: &str, data: &[u8]) -> Response<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
                 Content-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        self.send(
            Request::post("/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn edit(&self, id: i64, options: &[&str]) -> Response<Body> {
        let form = options
            .iter()
            .map(|o| format!("options={o}"))
            .collect::<Vec<_>>()
            .join("&");
        self.send(
            Request::post(format!("/edit/{id}"))
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form))
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&self, id: i64) -> Response<Body> {
        self.send(
            Request::post(format!("/delete/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub fn filenames(&self) -> Vec<String> {
        self.state
            .index
            .list(0, None)
            .unwrap()
            .images
            .into_iter()
            .map(|r| r.filename)
            .collect()
    }
}

/// A small gradient JPEG.
#[allow(dead_code)]
pub fn sample_jpeg() -> Vec<u8> {
    let img = RgbImage::from_fn(32, 20, |x, y| Rgb([(x * 8) as u8, (y * 12) as u8, 90]));
    codec::encode_jpeg(&img).unwrap()
}

#[allow(dead_code)]
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[allow(dead_code)]
pub fn assert_redirect_home(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
}
