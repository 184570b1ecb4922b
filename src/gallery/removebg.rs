use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

/// Default endpoint of the hosted background-removal API.
pub const DEFAULT_ENDPOINT: &str = "https://api.remove.bg/v1.0/removebg";

#[derive(Debug, thiserror::Error)]
pub enum RemoveBgError {
    #[error("background removal is not configured: no API key")]
    NotConfigured,

    #[error("background removal request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("background removal service returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Something that can strip the background from an encoded image.
#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    /// Return the processed image bytes as produced by the service.
    async fn remove_background(
        &self,
        image: Vec<u8>,
        filename: &str,
    ) -> Result<Vec<u8>, RemoveBgError>;
}

/// HTTP client for the remove.bg style API: multipart field `image_file`,
/// key in the `X-Api-Key` header.
pub struct RemoveBgClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl RemoveBgClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl BackgroundRemover for RemoveBgClient {
    async fn remove_background(
        &self,
        image: Vec<u8>,
        filename: &str,
    ) -> Result<Vec<u8>, RemoveBgError> {
        let api_key = self.api_key.as_deref().ok_or(RemoveBgError::NotConfigured)?;

        let part = Part::bytes(image)
            .file_name(filename.to_string())
            .mime_str("image/jpeg")?;
        let form = Form::new().part("image_file", part);

        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Api-Key", api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoveBgError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Multipart;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Router;

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1.0/removebg")
    }

    #[tokio::test]
    async fn sends_key_and_image_file_part() {
        let app = Router::new().route(
            "/v1.0/removebg",
            post(|headers: HeaderMap, mut form: Multipart| async move {
                if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("test-key") {
                    return (StatusCode::FORBIDDEN, Vec::new());
                }
                while let Some(field) = form.next_field().await.unwrap() {
                    if field.name() == Some("image_file") {
                        assert_eq!(field.file_name(), Some("photo.jpg"));
                        let mut data = field.bytes().await.unwrap().to_vec();
                        data.reverse();
                        return (StatusCode::OK, data);
                    }
                }
                (StatusCode::BAD_REQUEST, Vec::new())
            }),
        );
        let client = RemoveBgClient::new(spawn(app).await, Some("test-key".into()));

        let out = client
            .remove_background(b"abc".to_vec(), "photo.jpg")
            .await
            .unwrap();
        assert_eq!(out, b"cba");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let app = Router::new().route(
            "/v1.0/removebg",
            post(|_body: axum::body::Bytes| async {
                (StatusCode::BAD_REQUEST, "could not identify foreground")
            }),
        );
        let client = RemoveBgClient::new(spawn(app).await, Some("test-key".into()));

        let err = client
            .remove_background(b"abc".to_vec(), "photo.jpg")
            .await
            .unwrap_err();
        match err {
            RemoveBgError::Status { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "could not identify foreground");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_key_fails_without_a_request() {
        let client = RemoveBgClient::new("http://127.0.0.1:9/unused", Some("  ".into()));
        assert!(!client.is_configured());
        let err = client
            .remove_background(b"abc".to_vec(), "photo.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, RemoveBgError::NotConfigured));
    }
}
