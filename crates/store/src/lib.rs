//! Filesystem-backed persistence: the image asset store and the history
//! ledger document.

pub mod assets;
pub mod error;
pub mod ledger;

pub use assets::AssetStore;
pub use error::StoreError;
pub use ledger::HistoryLedger;
