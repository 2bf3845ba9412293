use axum::routing::get;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// Mount asset retrieval at the root (`/uploads/{filename}`).
pub fn router() -> Router<AppState> {
    Router::new().route("/uploads/{filename}", get(uploads::get_upload))
}
