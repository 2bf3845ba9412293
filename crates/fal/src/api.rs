//! REST client for the fal.ai queue endpoints.
//!
//! Wraps submission, status polling, and result retrieval using
//! [`reqwest`]. Every request carries the `Authorization: Key <key>` header.

use crate::messages::{ImageOutput, QueueStatus, SubmitResponse, TransformInput};

/// Default queue base URL.
pub const DEFAULT_QUEUE_URL: &str = "https://queue.fal.run";

/// HTTP client for the fal.ai queue.
#[derive(Clone)]
pub struct FalApi {
    client: reqwest::Client,
    queue_url: String,
    api_key: String,
}

impl std::fmt::Debug for FalApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FalApi")
            .field("queue_url", &self.queue_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Errors from the transform service layer.
#[derive(Debug, thiserror::Error)]
pub enum FalError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The queue returned a non-2xx status code.
    #[error("fal API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The request ran but the model reported a failure.
    #[error("Generation failed: {0}")]
    Failed(String),

    /// A response body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl FalApi {
    /// Create a client for the queue at `queue_url` (e.g.
    /// `https://queue.fal.run`), authenticating with `api_key`.
    pub fn new(queue_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), queue_url, api_key)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        queue_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            queue_url: queue_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }

    /// Queue a job for `model` (e.g. `fal-ai/flux-pro/kontext`).
    pub async fn submit(
        &self,
        model: &str,
        input: &TransformInput,
    ) -> Result<SubmitResponse, FalError> {
        let response = self
            .client
            .post(format!("{}/{}", self.queue_url, model.trim_matches('/')))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(input)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the current queue status, including accumulated logs.
    pub async fn status(&self, status_url: &str) -> Result<QueueStatus, FalError> {
        let response = self
            .client
            .get(status_url)
            .query(&[("logs", "1")])
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the output of a completed request.
    pub async fn result(&self, response_url: &str) -> Result<ImageOutput, FalError> {
        let response = self
            .client
            .get(response_url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Status URL for a request when the submission response omitted one.
    pub fn default_status_url(&self, model: &str, request_id: &str) -> String {
        format!("{}/requests/{request_id}/status", self.model_base(model))
    }

    /// Result URL for a request when the submission response omitted one.
    pub fn default_response_url(&self, model: &str, request_id: &str) -> String {
        format!("{}/requests/{request_id}", self.model_base(model))
    }

    // ---- private helpers ----

    fn auth_header(&self) -> String {
        format!("Key {}", self.api_key)
    }

    /// Requests are addressed by `owner/app`; deeper model path segments
    /// only apply to submission.
    fn model_base(&self, model: &str) -> String {
        let app: Vec<&str> = model
            .trim_matches('/')
            .split('/')
            .take(2)
            .collect();
        format!("{}/{}", self.queue_url, app.join("/"))
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, FalError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(FalError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, FalError> {
        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| FalError::Decode(e.to_string()))
    }
}
