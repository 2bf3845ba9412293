//! Transform job engine.
//!
//! - [`orchestrator`]: drives one job from validation to ledger entry.
//! - [`progress`]: drains service progress events into the log.

pub mod orchestrator;
pub mod progress;
