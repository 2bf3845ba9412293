//! Bounded, newest-first history of completed transform jobs.
//!
//! The ledger is a single JSON array document on disk. Mutations go through
//! one [`HistoryLedger`] instance per process, which serializes every
//! read-modify-write behind a mutex and replaces the document by writing a
//! sibling temp file and renaming it into place.

use std::path::{Path, PathBuf};

use restyle_core::history::HistoryEntry;
use restyle_core::types::DEFAULT_HISTORY_CAPACITY;
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::StoreError;

pub struct HistoryLedger {
    path: PathBuf,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl HistoryLedger {
    /// Ledger backed by the document at `path`, keeping at most `capacity`
    /// entries. A capacity of zero is raised to one.
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity: capacity.max(1),
            write_lock: Mutex::new(()),
        }
    }

    /// Ledger with the default capacity of 50 entries.
    pub fn with_default_capacity(path: impl Into<PathBuf>) -> Self {
        Self::new(path, DEFAULT_HISTORY_CAPACITY)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries, newest first.
    ///
    /// A missing document is an empty ledger. An unreadable or corrupt
    /// document is also treated as empty and reported as a warning; the
    /// service stays available rather than failing every request.
    pub async fn load(&self) -> Vec<HistoryEntry> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "History ledger unreadable, treating as empty",
                );
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<HistoryEntry>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "History ledger failed to parse, treating as empty",
                );
                Vec::new()
            }
        }
    }

    /// Insert `entry` at the front, evicting the oldest entries beyond
    /// capacity, and persist.
    pub async fn append(&self, entry: HistoryEntry) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load().await;
        let id = entry.id.clone();
        entries.insert(0, entry);

        let evicted = entries.len().saturating_sub(self.capacity);
        entries.truncate(self.capacity);
        self.persist(&entries).await?;

        tracing::debug!(id = %id, len = entries.len(), evicted, "Appended history entry");
        Ok(())
    }

    /// Remove the entry with `id` and persist. Returns the removed entry so
    /// the caller can clean up its assets.
    ///
    /// An unknown id is `NotFound` and leaves the document untouched.
    pub async fn remove(&self, id: &str) -> Result<HistoryEntry, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load().await;
        let index = entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let removed = entries.remove(index);
        self.persist(&entries).await?;

        tracing::debug!(id, len = entries.len(), "Removed history entry");
        Ok(removed)
    }

    async fn persist(&self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(entries)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let tmp = self.temp_path();
        fs::write(&tmp, &body)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "history.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
