//! Domain types and pure logic for the restyle service.
//!
//! Nothing in this crate touches the filesystem or the network; storage
//! lives in `restyle-store` and the external service client in `restyle-fal`.

pub mod assets;
pub mod error;
pub mod history;
pub mod naming;
pub mod types;
pub mod upload;
