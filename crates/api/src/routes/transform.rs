//! Route definitions for transform job submission.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::transform;
use crate::state::AppState;

/// Room for multipart boundaries and the prompt field on top of the file.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// ```text
/// POST /transform-image  -> transform_image
/// ```
///
/// The body limit sits above the upload ceiling so that oversized files
/// reach validation and get a descriptive 400.
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().route(
        "/transform-image",
        post(transform::transform_image).layer(DefaultBodyLimit::max(
            max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
        )),
    )
}
