use axum::extract::{Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;

use crate::error::AppResult;
use crate::state::AppState;

/// Assets never change once written.
pub const ASSET_CACHE_CONTROL: &str = "public, max-age=31536000";

/// GET /uploads/{filename}
pub async fn get_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    let bytes = state.assets.read(&filename).await?;
    let content_type = state.assets.content_type_of(&filename);

    Ok((
        [(CONTENT_TYPE, content_type), (CACHE_CONTROL, ASSET_CACHE_CONTROL)],
        bytes,
    ))
}
