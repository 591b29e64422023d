//! HTTP client for the extraction backend

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::models::{
    HistoryEntry, ModelsResponse, SendMessageRequest, SendMessageResponse, UploadOutcome,
};

/// File extensions the backend can extract requirements from
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt"];

/// Byte-level upload progress callback: `(bytes_sent, bytes_total)`
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Client for the extraction backend API
#[derive(Debug, Clone)]
pub struct ExtractionBackend {
    config: BackendConfig,
    client: Client,
}

impl ExtractionBackend {
    /// Create a client from a validated configuration
    pub fn new(mut config: BackendConfig) -> Result<Self, BackendError> {
        config.normalize();
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| BackendError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// Create a client with configuration loaded from env/files/defaults
    pub fn from_env() -> Result<Self, BackendError> {
        Self::new(BackendConfig::load_with_precedence()?)
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Send a chat message and wait for the model's reply.
    ///
    /// `POST /v1/chat`
    pub async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, BackendError> {
        debug!(model_id = %request.model_id, "Sending chat message");

        let response = self
            .client
            .post(self.url("/v1/chat"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Chat request failed");
            return Err(BackendError::from_status(status.as_u16(), &body));
        }

        Ok(response.json().await?)
    }

    /// List the models the backend can run.
    ///
    /// `GET /chat/models`; an absent `available_models` field reads as an
    /// empty list.
    pub async fn list_models(&self) -> Result<Vec<String>, BackendError> {
        debug!("Fetching available models");

        let response = self.client.get(self.url("/chat/models")).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Model listing failed");
            return Err(BackendError::from_status(status.as_u16(), &body));
        }

        let models: ModelsResponse = response.json().await?;
        Ok(models.available_models)
    }

    /// Fetch the server-side conversation history.
    ///
    /// `GET /chat/history`
    pub async fn chat_history(&self) -> Result<Vec<HistoryEntry>, BackendError> {
        debug!("Fetching chat history");

        let response = self.client.get(self.url("/chat/history")).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "History fetch failed");
            return Err(BackendError::from_status(status.as_u16(), &body));
        }

        Ok(response.json().await?)
    }

    /// Upload a document for requirement extraction.
    ///
    /// `POST /chat/extract_requirements`, multipart with a `model_id` text
    /// field and the `file` part. The file must exist and carry a supported
    /// extension; bytes-sent progress is reported through `progress` as the
    /// body streams out.
    pub async fn upload_file(
        &self,
        model_id: &str,
        path: &Path,
        progress: Option<ProgressFn>,
    ) -> Result<UploadOutcome, BackendError> {
        validate_upload_path(path)?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        let bytes = tokio::fs::read(path).await?;
        let total = bytes.len() as u64;
        debug!(file = %file_name, bytes = total, model_id, "Uploading document");

        let part = Part::stream_with_length(progress_body(bytes, total, progress), total)
            .file_name(file_name)
            .mime_str(mime.essence_str())
            .map_err(|e| BackendError::Config(format!("Invalid MIME type: {}", e)))?;
        let form = Form::new()
            .text("model_id", model_id.to_string())
            .part("file", part);

        let response = self
            .client
            .post(self.url("/chat/extract_requirements"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            warn!(status = %status, "Upload failed");
            return Err(BackendError::from_status(status.as_u16(), &body));
        }

        // The backend answers with whatever its extraction pipeline produced;
        // keep non-JSON bodies as plain strings.
        let payload = serde_json::from_str::<Value>(&body)
            .unwrap_or_else(|_| Value::String(body));
        Ok(UploadOutcome { payload })
    }
}

/// Reject uploads the backend would refuse anyway, before sending bytes
fn validate_upload_path(path: &Path) -> Result<(), BackendError> {
    if !path.exists() {
        return Err(BackendError::InvalidUpload(format!(
            "File not found: {}",
            path.display()
        )));
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(BackendError::InvalidUpload(format!(
            "Unsupported file type '{}', expected one of: {}",
            extension,
            SUPPORTED_EXTENSIONS.join(", ")
        )));
    }
    Ok(())
}

/// Wrap file bytes in a chunked body that reports progress as reqwest pulls it
fn progress_body(bytes: Vec<u8>, total: u64, progress: Option<ProgressFn>) -> Body {
    let chunks: Vec<Vec<u8>> = bytes
        .chunks(UPLOAD_CHUNK_SIZE)
        .map(|chunk| chunk.to_vec())
        .collect();
    let sent = Arc::new(AtomicU64::new(0));
    let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
        let done = sent.fetch_add(chunk.len() as u64, Ordering::Relaxed) + chunk.len() as u64;
        if let Some(callback) = &progress {
            callback(done, total);
        }
        Ok::<_, std::io::Error>(chunk)
    }));
    Body::wrap_stream(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_file() {
        let err = validate_upload_path(Path::new("/nonexistent/report.pdf")).unwrap_err();
        assert!(matches!(err, BackendError::InvalidUpload(_)));
    }

    #[test]
    fn rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.exe");
        std::fs::write(&path, b"binary").unwrap();
        let err = validate_upload_path(&path).unwrap_err();
        match err {
            BackendError::InvalidUpload(message) => {
                assert!(message.contains("exe"));
                assert!(message.contains("pdf"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn accepts_supported_extensions_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["spec.pdf", "spec.DOCX", "spec.Txt"] {
            let path = dir.path().join(name);
            std::fs::write(&path, b"content").unwrap();
            assert!(validate_upload_path(&path).is_ok(), "{name} should pass");
        }
    }
}
