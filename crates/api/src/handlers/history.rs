//! Handlers for the `/history` resource.
//!
//! Reads and deletes go straight to the ledger and asset store; the
//! transform engine is not involved.

use axum::extract::{Path, State};
use axum::Json;
use restyle_core::error::CoreError;
use restyle_core::history::HistoryEntry;
use restyle_store::StoreError;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::Success;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HistoryList {
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: &'static str,
}

/// GET /api/history
///
/// All recorded jobs, newest first.
pub async fn list_history(State(state): State<AppState>) -> Json<Success<HistoryList>> {
    let history = state.ledger.load().await;
    Json(Success::new(HistoryList { history }))
}

/// DELETE /api/history/{id}
///
/// Remove the entry, then make a best-effort attempt to delete both of its
/// images. The ledger is authoritative: asset cleanup failures are logged
/// and the response still reports success.
pub async fn delete_history_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Success<Deleted>>> {
    let entry = state.ledger.remove(&id).await.map_err(|e| match e {
        StoreError::NotFound(id) => AppError::Core(CoreError::NotFound {
            entity: "History item",
            id,
        }),
        other => AppError::Store(other),
    })?;

    for filename in entry.asset_filenames() {
        if let Err(e) = state.assets.delete(filename).await {
            tracing::warn!(id = %entry.id, filename, error = %e, "Failed to delete asset of history item");
        }
    }
    tracing::info!(id = %entry.id, "History item deleted");

    Ok(Json(Success::new(Deleted {
        message: "History item deleted",
    })))
}
