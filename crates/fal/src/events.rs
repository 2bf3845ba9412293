//! Progress events emitted while a transform request runs.
//!
//! These are observability signal only. Consumers may drop them; nothing in
//! the job flow waits on their delivery.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The request is waiting in the service queue.
    Queued {
        request_id: String,
        position: Option<u32>,
    },

    /// A log line produced by the model while the request is in progress.
    Log { request_id: String, message: String },

    /// The service finished the request (successfully or not).
    Completed { request_id: String },
}
