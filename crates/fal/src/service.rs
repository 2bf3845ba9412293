//! The transform service seam and its fal.ai queue implementation.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::api::{FalApi, FalError};
use crate::events::ProgressEvent;
use crate::messages::{unseen_logs, LogEntry, QueueStatus, TransformInput};

/// Channel on which a service reports progress. Sends never block.
pub type ProgressSender = mpsc::UnboundedSender<ProgressEvent>;

/// Outcome of a finished transform request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    /// Id the service assigned to the request.
    pub request_id: String,
    /// Result image URLs in service order. May be empty.
    pub image_urls: Vec<String>,
}

/// An asynchronous prompt-guided image transform.
///
/// Implementations submit the job, report progress on `progress` as it
/// happens, and resolve once the result is available or the job failed.
#[async_trait]
pub trait TransformService: Send + Sync {
    async fn transform(
        &self,
        input: TransformInput,
        progress: ProgressSender,
    ) -> Result<TransformOutput, FalError>;
}

/// Default model used for image edits.
pub const DEFAULT_MODEL: &str = "fal-ai/flux-pro/kontext";

/// Default delay between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// [`TransformService`] backed by the fal.ai queue: submit, poll status
/// until completed, then fetch the result.
#[derive(Debug, Clone)]
pub struct FalTransformService {
    api: FalApi,
    model: String,
    poll_interval: Duration,
}

impl FalTransformService {
    pub fn new(api: FalApi, model: impl Into<String>, poll_interval: Duration) -> Self {
        Self {
            api,
            model: model.into(),
            poll_interval,
        }
    }
}

#[async_trait]
impl TransformService for FalTransformService {
    async fn transform(
        &self,
        input: TransformInput,
        progress: ProgressSender,
    ) -> Result<TransformOutput, FalError> {
        let submitted = self.api.submit(&self.model, &input).await?;
        let request_id = submitted.request_id;
        tracing::info!(request_id = %request_id, model = %self.model, "Submitted transform request");

        let status_url = submitted
            .status_url
            .unwrap_or_else(|| self.api.default_status_url(&self.model, &request_id));
        let response_url = submitted
            .response_url
            .unwrap_or_else(|| self.api.default_response_url(&self.model, &request_id));

        let _ = progress.send(ProgressEvent::Queued {
            request_id: request_id.clone(),
            position: submitted.queue_position,
        });

        let mut seen_logs = 0usize;
        loop {
            match self.api.status(&status_url).await? {
                QueueStatus::InQueue { queue_position } => {
                    let _ = progress.send(ProgressEvent::Queued {
                        request_id: request_id.clone(),
                        position: queue_position,
                    });
                }
                QueueStatus::InProgress { logs } => {
                    emit_logs(&progress, &request_id, logs.as_deref(), &mut seen_logs);
                }
                QueueStatus::Completed { logs, error } => {
                    emit_logs(&progress, &request_id, logs.as_deref(), &mut seen_logs);
                    let _ = progress.send(ProgressEvent::Completed {
                        request_id: request_id.clone(),
                    });
                    if let Some(error) = error {
                        tracing::warn!(request_id = %request_id, error = %error, "Transform request failed");
                        return Err(FalError::Failed(error));
                    }
                    break;
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        }

        let output = self.api.result(&response_url).await?;
        tracing::info!(
            request_id = %request_id,
            images = output.images.len(),
            "Transform request completed",
        );

        Ok(TransformOutput {
            request_id,
            image_urls: output.images.into_iter().map(|img| img.url).collect(),
        })
    }
}

fn emit_logs(
    progress: &ProgressSender,
    request_id: &str,
    logs: Option<&[LogEntry]>,
    seen: &mut usize,
) {
    for log in unseen_logs(logs.unwrap_or_default(), seen) {
        let _ = progress.send(ProgressEvent::Log {
            request_id: request_id.to_string(),
            message: log.message.clone(),
        });
    }
}
