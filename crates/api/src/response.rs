//! Shared response envelope for API handlers.
//!
//! Successful responses are `{ "success": true, ...payload }`, with the
//! payload's fields flattened alongside the flag.

use serde::Serialize;

/// `{ "success": true, ...T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(Success::new(HistoryList { history })))
/// ```
#[derive(Debug, Serialize)]
pub struct Success<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> Success<T> {
    pub fn new(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}
