//! Client for the fal.ai queue API used to run prompt-guided image
//! transforms.
//!
//! Provides typed queue messages, an HTTP wrapper over the queue endpoints,
//! progress event types, and the [`service::TransformService`] seam the
//! orchestrator drives.

pub mod api;
pub mod events;
pub mod messages;
pub mod service;
