//! The durable record of a completed transform job.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// One row of the history ledger.
///
/// Serialized with camelCase keys; the ledger document is a JSON array of
/// these, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Millisecond timestamp string, strictly increasing within a process.
    pub id: String,
    pub timestamp: Timestamp,
    /// Filename of the uploaded source image in the asset store.
    pub original_image: String,
    /// Filename of the generated image in the asset store.
    pub generated_image: String,
    pub prompt: String,
    /// Request id assigned by the external transform service.
    pub request_id: String,
}

impl HistoryEntry {
    /// Filenames of both assets referenced by this entry.
    pub fn asset_filenames(&self) -> [&str; 2] {
        [&self.original_image, &self.generated_image]
    }
}
