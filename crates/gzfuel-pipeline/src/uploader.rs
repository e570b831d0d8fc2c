//! Authenticated multipart upload to the Fuel server.

use std::time::Duration;

use gzfuel_core::config::upload::UploadConfig;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, warn};

use crate::error::PipelineError;
use crate::models::{UploadPayload, UploadResult};

/// Path of the model creation endpoint, relative to the server base URL.
pub const UPLOAD_PATH: &str = "/1.0/models";

/// Error body returned by the Fuel server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: String,
}

/// Posts payloads to `{base_url}/1.0/models`, one request per model.
///
/// Every attempt is followed by a fixed pause, whatever its outcome.
#[derive(Debug, Clone)]
pub struct Uploader {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    delay: Duration,
}

impl Uploader {
    /// Create an uploader for the server at `base_url`.
    pub fn new(
        base_url: &str,
        token: impl Into<String>,
        config: &UploadConfig,
    ) -> Result<Self, PipelineError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), UPLOAD_PATH),
            token: token.into(),
            delay: config.delay(),
        })
    }

    /// Override the pause applied after each attempt.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Full URL of the upload endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Pause applied after each attempt.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Send `payload` once, then wait for the configured delay.
    pub async fn upload(&self, payload: &UploadPayload) -> UploadResult {
        let result = self.send(payload).await;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        result
    }

    async fn send(&self, payload: &UploadPayload) -> UploadResult {
        let form = match build_form(payload).await {
            Ok(form) => form,
            Err(e) => {
                error!(model = %payload.name, error = %e, "Failed to open model files");
                return UploadResult::Failure(String::new());
            }
        };

        debug!(
            endpoint = %self.endpoint,
            model = %payload.name,
            files = payload.files.len(),
            bytes = payload.total_file_bytes(),
            "Sending upload"
        );

        let response = match self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "Upload request failed");
                return UploadResult::Failure(String::new());
            }
        };

        let status = response.status();
        if status == StatusCode::OK {
            return UploadResult::Success;
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "Upload rejected");
        UploadResult::Failure(extract_error_message(&body))
    }
}

/// Build the multipart form: text fields first, then one `file` part per file.
///
/// File contents are streamed from disk with known lengths, so the request
/// carries an exact `Content-Length`.
pub async fn build_form(payload: &UploadPayload) -> std::io::Result<Form> {
    let mut form = Form::new();

    for (name, value) in payload.fields() {
        form = form.text(name, value);
    }

    for file in &payload.files {
        let handle = tokio::fs::File::open(&file.path).await?;
        let len = handle.metadata().await?.len();
        let body = reqwest::Body::wrap_stream(ReaderStream::new(handle));
        let part = Part::stream_with_length(body, len).file_name(file.upload_name.clone());
        form = form.part("file", part);
    }

    Ok(form)
}

/// The `msg` field of a JSON error body, or an empty string.
pub fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.msg)
        .unwrap_or_default()
}
