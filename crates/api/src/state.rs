use std::sync::Arc;

use restyle_fal::service::TransformService;
use restyle_store::{AssetStore, HistoryLedger};

use crate::config::ServerConfig;
use crate::engine::orchestrator::{JobLimits, TransformOrchestrator};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Image storage for uploads and results.
    pub assets: Arc<AssetStore>,
    /// History of completed jobs. The only process-wide mutable document;
    /// all mutations go through this instance.
    pub ledger: Arc<HistoryLedger>,
    /// Runs transform jobs.
    pub orchestrator: Arc<TransformOrchestrator>,
}

impl AppState {
    /// Wire the stores and orchestrator from configuration around the given
    /// transform service.
    pub fn new(config: Arc<ServerConfig>, service: Arc<dyn TransformService>) -> Self {
        let assets = Arc::new(AssetStore::new(config.upload_dir.clone()));
        let ledger = Arc::new(HistoryLedger::new(
            config.history_file.clone(),
            config.history_capacity,
        ));
        let orchestrator = Arc::new(TransformOrchestrator::new(
            service,
            Arc::clone(&assets),
            Arc::clone(&ledger),
            JobLimits {
                max_upload_bytes: config.max_upload_bytes,
                download_timeout: config.download_timeout(),
                job_timeout: config.job_timeout(),
            },
        ));

        Self {
            config,
            assets,
            ledger,
            orchestrator,
        }
    }
}
