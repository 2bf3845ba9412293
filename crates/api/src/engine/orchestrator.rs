//! End-to-end execution of a single transform job.
//!
//! ```text
//! RECEIVED -> VALIDATED -> SUBMITTED -> IN_PROGRESS -> COMPLETED
//!      \           \            \             \
//!       +-----------+------------+-------------+----> FAILED
//! ```
//!
//! A history entry is appended only after the generated image has been
//! written to the asset store, and the generated image is removed again if
//! that append fails, so the ledger never references a missing result and
//! never misses a stored one.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use base64::Engine;
use restyle_core::assets::extension_for_content_type;
use restyle_core::error::CoreError;
use restyle_core::history::HistoryEntry;
use restyle_core::naming::{generated_filename, upload_filename, MillisClock};
use restyle_core::upload::{validate_request, UploadMeta};
use restyle_fal::messages::TransformInput;
use restyle_fal::service::TransformService;
use restyle_store::{AssetStore, HistoryLedger};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::engine::progress;

/// Detail reported when the service finished without any result image.
pub const NO_RESULT_IMAGE: &str = "No generated image received";

/// Per-job lifecycle states, used for logging transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Received,
    Validated,
    Submitted,
    InProgress,
    Completed,
    Failed,
}

impl JobState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "RECEIVED",
            Self::Validated => "VALIDATED",
            Self::Submitted => "SUBMITTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

/// Why a transform job failed.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// Bad or missing input; the service was never called.
    #[error("{0}")]
    Validation(String),

    /// The external service rejected or failed the job.
    #[error("{0}")]
    Upstream(String),

    /// Fetching the generated image failed or timed out.
    #[error("{0}")]
    Download(String),

    /// Writing an asset or the ledger failed.
    #[error("{0}")]
    Io(String),
}

/// An uploaded file as received from the multipart form.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Result of a successful job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutcome {
    pub original_image: String,
    pub generated_image: String,
    pub prompt: String,
    pub request_id: String,
}

/// Limits applied to every job.
#[derive(Debug, Clone, Copy)]
pub struct JobLimits {
    pub max_upload_bytes: usize,
    pub download_timeout: Duration,
    /// Bound on the submit/poll stage; `None` waits indefinitely.
    pub job_timeout: Option<Duration>,
}

/// Runs transform jobs against a [`TransformService`], persisting results
/// into the asset store and history ledger.
pub struct TransformOrchestrator {
    service: Arc<dyn TransformService>,
    assets: Arc<AssetStore>,
    ledger: Arc<HistoryLedger>,
    http: reqwest::Client,
    limits: JobLimits,
    clock: MillisClock,
}

impl TransformOrchestrator {
    pub fn new(
        service: Arc<dyn TransformService>,
        assets: Arc<AssetStore>,
        ledger: Arc<HistoryLedger>,
        limits: JobLimits,
    ) -> Self {
        Self {
            service,
            assets,
            ledger,
            http: reqwest::Client::new(),
            limits,
            clock: MillisClock::new(),
        }
    }

    /// Execute one job to completion or failure.
    pub async fn run(
        &self,
        image: Option<UploadedImage>,
        prompt: Option<String>,
    ) -> Result<TransformOutcome, TransformError> {
        let job_id = Uuid::new_v4();
        transition(job_id, JobState::Received);

        let result = self.execute(job_id, image, prompt).await;
        match &result {
            Ok(outcome) => tracing::info!(
                %job_id,
                state = JobState::Completed.as_str(),
                generated_image = %outcome.generated_image,
                request_id = %outcome.request_id,
                "Transform job completed",
            ),
            Err(e) => tracing::warn!(
                %job_id,
                state = JobState::Failed.as_str(),
                error = %e,
                "Transform job failed",
            ),
        }
        result
    }

    async fn execute(
        &self,
        job_id: Uuid,
        image: Option<UploadedImage>,
        prompt: Option<String>,
    ) -> Result<TransformOutcome, TransformError> {
        // --- RECEIVED -> VALIDATED ---
        let meta = image.as_ref().map(|img| UploadMeta {
            content_type: img.content_type.as_deref(),
            size_bytes: img.bytes.len(),
        });
        let prompt = validate_request(meta, prompt.as_deref(), self.limits.max_upload_bytes)
            .map_err(|e| match e {
                CoreError::Validation(msg) => TransformError::Validation(msg),
                other => TransformError::Validation(other.to_string()),
            })?
            .to_string();
        let image = image.ok_or_else(|| TransformError::Validation("No image file uploaded".into()))?;
        let mime = image.content_type.as_deref().unwrap_or("image/jpeg").trim();
        transition(job_id, JobState::Validated);

        let original_image = self
            .assets
            .write(&image.bytes, &upload_filename(self.clock.next(), &image.file_name))
            .await
            .map_err(|e| TransformError::Io(format!("Failed to store upload: {e}")))?;

        // --- VALIDATED -> SUBMITTED ---
        let input = TransformInput {
            prompt: prompt.clone(),
            image_url: data_url(mime, &image.bytes),
        };
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(progress::log_progress(job_id, rx));
        transition(job_id, JobState::Submitted);

        // --- SUBMITTED -> IN_PROGRESS -> result ---
        let call = self.service.transform(input, tx);
        let output = match self.limits.job_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                TransformError::Upstream(format!(
                    "Transform service did not finish within {}s",
                    limit.as_secs()
                ))
            })?,
            None => call.await,
        }
        .map_err(|e| TransformError::Upstream(e.to_string()))?;
        transition(job_id, JobState::InProgress);

        let result_url = output
            .image_urls
            .first()
            .ok_or_else(|| TransformError::Upstream(NO_RESULT_IMAGE.into()))?;
        tracing::debug!(%job_id, request_id = %output.request_id, url = %result_url, "Downloading result");

        let (bytes, content_type) = self.download(result_url).await?;
        let extension = extension_for_content_type(content_type.as_deref());

        // --- IN_PROGRESS -> COMPLETED ---
        let stamp = self.clock.next();
        let generated_image = self
            .assets
            .write(&bytes, &generated_filename(stamp, extension))
            .await
            .map_err(|e| TransformError::Io(format!("Failed to store generated image: {e}")))?;

        let entry = HistoryEntry {
            id: stamp.to_string(),
            timestamp: chrono::Utc::now(),
            original_image: original_image.clone(),
            generated_image: generated_image.clone(),
            prompt: prompt.clone(),
            request_id: output.request_id.clone(),
        };
        if let Err(e) = self.ledger.append(entry).await {
            if let Err(cleanup) = self.assets.delete(&generated_image).await {
                tracing::warn!(%job_id, filename = %generated_image, error = %cleanup, "Failed to remove unrecorded result");
            }
            return Err(TransformError::Io(format!("Failed to record history: {e}")));
        }

        Ok(TransformOutcome {
            original_image,
            generated_image,
            prompt,
            request_id: output.request_id,
        })
    }

    /// Fetch a result image, returning its bytes and `Content-Type`.
    async fn download(&self, url: &str) -> Result<(Bytes, Option<String>), TransformError> {
        let timeout = self.limits.download_timeout;
        let describe = |e: reqwest::Error| {
            if e.is_timeout() {
                TransformError::Download(format!(
                    "Image download timed out after {}s",
                    timeout.as_secs()
                ))
            } else {
                TransformError::Download(format!("Image download failed: {e}"))
            }
        };

        let response = self
            .http
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(describe)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransformError::Download(format!(
                "Image download failed with status {}",
                status.as_u16()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await.map_err(describe)?;
        tracing::debug!(url, bytes = bytes.len(), "Image download successful");

        Ok((bytes, content_type))
    }
}

/// Encode image bytes as a `data:<mime>;base64,<payload>` URL.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{payload}")
}

fn transition(job_id: Uuid, state: JobState) {
    tracing::info!(%job_id, state = state.as_str(), "Transform job state");
}
