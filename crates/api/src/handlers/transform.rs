//! Handler for submitting a transform job.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use restyle_core::upload::too_large_message;
use serde::Serialize;

use crate::engine::orchestrator::{TransformError, TransformOutcome, UploadedImage};
use crate::error::{AppError, AppResult};
use crate::response::Success;
use crate::state::AppState;

/// Name of the multipart field carrying the image file.
pub const FIELD_IMAGE: &str = "image";
/// Name of the multipart field carrying the prompt text.
pub const FIELD_PROMPT: &str = "prompt";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResponse {
    pub original_image: String,
    pub generated_image: String,
    pub prompt: String,
    pub request_id: String,
}

impl From<TransformOutcome> for TransformResponse {
    fn from(outcome: TransformOutcome) -> Self {
        Self {
            original_image: outcome.original_image,
            generated_image: outcome.generated_image,
            prompt: outcome.prompt,
            request_id: outcome.request_id,
        }
    }
}

/// POST /api/transform-image
///
/// Multipart form with `image` (file) and `prompt` (text). Runs the job
/// inline; the connection stays open until it completes or fails.
///
/// A body that is not `multipart/form-data` carries no image and is
/// rejected as such.
pub async fn transform_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<Success<TransformResponse>>> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected non-multipart transform request");
        TransformError::Validation("No image file uploaded".into())
    })?;
    let mut image = None;
    let mut prompt = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, state.config.max_upload_bytes))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(FIELD_IMAGE) => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, state.config.max_upload_bytes))?;
                image = Some(UploadedImage {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            Some(FIELD_PROMPT) => {
                prompt = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| multipart_error(e, state.config.max_upload_bytes))?,
                );
            }
            _ => {}
        }
    }

    let outcome = state.orchestrator.run(image, prompt).await?;
    Ok(Json(Success::new(outcome.into())))
}

fn multipart_error(err: axum::extract::multipart::MultipartError, max_upload_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::BadRequest(too_large_message(max_upload_bytes))
    } else {
        AppError::BadRequest(err.body_text())
    }
}
