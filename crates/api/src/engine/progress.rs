//! Progress event consumer for transform jobs.
//!
//! Runs as its own task so a slow or absent consumer never holds up the
//! job; the channel ends when the service drops its sender.

use restyle_fal::events::ProgressEvent;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Log every progress event for `job_id` until the channel closes.
///
/// Returns the number of events observed.
pub async fn log_progress(job_id: Uuid, mut rx: mpsc::UnboundedReceiver<ProgressEvent>) -> usize {
    let mut count = 0;
    while let Some(event) = rx.recv().await {
        count += 1;
        match event {
            ProgressEvent::Queued {
                request_id,
                position,
            } => {
                tracing::debug!(%job_id, request_id = %request_id, ?position, "Queued at transform service");
            }
            ProgressEvent::Log {
                request_id,
                message,
            } => {
                tracing::info!(%job_id, request_id = %request_id, "{message}");
            }
            ProgressEvent::Completed { request_id } => {
                tracing::debug!(%job_id, request_id = %request_id, "Transform service finished");
            }
        }
    }
    count
}
