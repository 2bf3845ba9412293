//! fal.ai queue message types.
//!
//! The queue answers status requests with `{"status": "<STATE>", ...}`.
//! The `logs` array is cumulative: every poll returns all lines so far.

use serde::{Deserialize, Serialize};

/// Request body for a Kontext-style image edit job.
#[derive(Debug, Clone, Serialize)]
pub struct TransformInput {
    pub prompt: String,
    /// Source image, usually a `data:` URL.
    pub image_url: String,
}

/// Response to a queue submission.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub request_id: String,
    #[serde(default)]
    pub status_url: Option<String>,
    #[serde(default)]
    pub response_url: Option<String>,
    #[serde(default)]
    pub queue_position: Option<u32>,
}

/// Queue state of a submitted request.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueStatus {
    InQueue {
        #[serde(default)]
        queue_position: Option<u32>,
    },
    InProgress {
        #[serde(default)]
        logs: Option<Vec<LogEntry>>,
    },
    Completed {
        #[serde(default)]
        logs: Option<Vec<LogEntry>>,
        /// Set when the request finished with a model-side failure.
        #[serde(default)]
        error: Option<String>,
    },
}

/// One log line emitted by the model while it runs.
#[derive(Debug, Clone, Deserialize)]
pub struct LogEntry {
    pub message: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Result payload of an image model.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageOutput {
    #[serde(default)]
    pub images: Vec<OutputImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputImage {
    pub url: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Parse a status response body.
pub fn parse_status(text: &str) -> Result<QueueStatus, serde_json::Error> {
    serde_json::from_str(text)
}

/// Slice of `logs` not yet surfaced, advancing `seen` past it.
///
/// If the service ever returns fewer lines than already seen, the counter
/// is clamped and nothing is repeated.
pub fn unseen_logs<'a>(logs: &'a [LogEntry], seen: &mut usize) -> &'a [LogEntry] {
    let start = (*seen).min(logs.len());
    *seen = (*seen).max(logs.len());
    &logs[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(message: &str) -> LogEntry {
        LogEntry {
            message: message.to_string(),
            level: None,
            timestamp: None,
        }
    }

    #[test]
    fn parse_in_queue() {
        let msg = parse_status(r#"{"status":"IN_QUEUE","queue_position":2,"response_url":"x"}"#)
            .unwrap();
        match msg {
            QueueStatus::InQueue { queue_position } => assert_eq!(queue_position, Some(2)),
            other => panic!("Expected InQueue, got {other:?}"),
        }
    }

    #[test]
    fn parse_in_progress_with_logs() {
        let json = r#"{"status":"IN_PROGRESS","logs":[{"message":"step 1","level":"INFO","timestamp":"t"}]}"#;
        match parse_status(json).unwrap() {
            QueueStatus::InProgress { logs } => {
                let logs = logs.unwrap();
                assert_eq!(logs.len(), 1);
                assert_eq!(logs[0].message, "step 1");
            }
            other => panic!("Expected InProgress, got {other:?}"),
        }
    }

    #[test]
    fn parse_in_progress_with_null_logs() {
        match parse_status(r#"{"status":"IN_PROGRESS","logs":null}"#).unwrap() {
            QueueStatus::InProgress { logs } => assert!(logs.is_none()),
            other => panic!("Expected InProgress, got {other:?}"),
        }
    }

    #[test]
    fn parse_completed_with_error() {
        match parse_status(r#"{"status":"COMPLETED","error":"NSFW content"}"#).unwrap() {
            QueueStatus::Completed { error, .. } => assert_eq!(error.as_deref(), Some("NSFW content")),
            other => panic!("Expected Completed, got {other:?}"),
        }
    }

    #[test]
    fn parse_unknown_status_fails() {
        assert!(parse_status(r#"{"status":"EXPLODED"}"#).is_err());
        assert!(parse_status("not json").is_err());
    }

    #[test]
    fn parse_image_output() {
        let json = r#"{"images":[{"url":"https://cdn/x.png","content_type":"image/png","width":1024}],"seed":7}"#;
        let out: ImageOutput = serde_json::from_str(json).unwrap();
        assert_eq!(out.images[0].url, "https://cdn/x.png");
        assert_eq!(out.images[0].content_type.as_deref(), Some("image/png"));

        let empty: ImageOutput = serde_json::from_str("{}").unwrap();
        assert!(empty.images.is_empty());
    }

    #[test]
    fn unseen_logs_surfaces_each_line_once() {
        let mut seen = 0;
        let first = vec![log("a"), log("b")];
        assert_eq!(unseen_logs(&first, &mut seen).len(), 2);

        let second = vec![log("a"), log("b"), log("c")];
        let fresh = unseen_logs(&second, &mut seen);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].message, "c");

        assert!(unseen_logs(&second, &mut seen).is_empty());
        assert!(unseen_logs(&first, &mut seen).is_empty());
        assert_eq!(seen, 3);
    }
}
