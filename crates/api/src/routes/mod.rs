pub mod health;
pub mod history;
pub mod transform;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// POST   /transform-image     submit a transform job (multipart)
/// GET    /history             list completed jobs, newest first
/// DELETE /history/{id}        remove a job and its images
/// ```
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(transform::router(max_upload_bytes))
        .nest("/history", history::router())
}
