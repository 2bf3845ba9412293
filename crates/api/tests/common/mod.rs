#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::routing;
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use restyle_api::config::{FalConfig, ServerConfig};
use restyle_api::router::build_app_router;
use restyle_api::state::AppState;
use restyle_fal::api::FalError;
use restyle_fal::events::ProgressEvent;
use restyle_fal::messages::TransformInput;
use restyle_fal::service::{ProgressSender, TransformOutput, TransformService};

/// Bytes served as the generated PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-png-body";

/// Request id the fake service reports.
pub const FAKE_REQUEST_ID: &str = "req-fake-1";

// ---------------------------------------------------------------------------
// Fake transform service
// ---------------------------------------------------------------------------

/// What the fake service does when called.
#[derive(Clone)]
pub enum Behavior {
    /// Finish with these result URLs.
    Images(Vec<String>),
    /// Fail with the given message.
    Fail(String),
    /// Never finish.
    Hang,
}

pub struct FakeService {
    behavior: Mutex<Behavior>,
    calls: AtomicUsize,
    last_input: Mutex<Option<TransformInput>>,
}

impl FakeService {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior: Mutex::new(behavior),
            calls: AtomicUsize::new(0),
            last_input: Mutex::new(None),
        })
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_input(&self) -> Option<TransformInput> {
        self.last_input.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransformService for FakeService {
    async fn transform(
        &self,
        input: TransformInput,
        progress: ProgressSender,
    ) -> Result<TransformOutput, FalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().unwrap() = Some(input);
        let behavior = self.behavior.lock().unwrap().clone();

        let _ = progress.send(ProgressEvent::Log {
            request_id: FAKE_REQUEST_ID.into(),
            message: "generating".into(),
        });

        match behavior {
            Behavior::Images(image_urls) => Ok(TransformOutput {
                request_id: FAKE_REQUEST_ID.into(),
                image_urls,
            }),
            Behavior::Fail(msg) => Err(FalError::Failed(msg)),
            Behavior::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Result image server
// ---------------------------------------------------------------------------

/// Serve result images on an ephemeral local port. Returns the base URL.
///
/// ```text
/// GET /out.png     200 image/png
/// GET /out.webp    200 image/webp
/// GET /untyped     200 without Content-Type
/// GET /slow.png    200 after 3 seconds
/// anything else    404
/// ```
pub async fn spawn_image_server() -> String {
    let app = Router::new()
        .route(
            "/out.png",
            routing::get(|| async { ([(header::CONTENT_TYPE, "image/png")], PNG_BYTES) }),
        )
        .route(
            "/out.webp",
            routing::get(|| async { ([(header::CONTENT_TYPE, "image/webp")], PNG_BYTES) }),
        )
        .route(
            "/untyped",
            routing::get(|| async {
                Response::builder()
                    .status(StatusCode::OK)
                    .body(Body::from(PNG_BYTES))
                    .unwrap()
            }),
        )
        .route(
            "/slow.png",
            routing::get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                ([(header::CONTENT_TYPE, "image/png")], PNG_BYTES)
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Test application
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub service: Arc<FakeService>,
    pub config: ServerConfig,
    /// Keeps the temporary directories alive for the test's duration.
    pub dir: TempDir,
}

impl TestApp {
    pub fn upload_dir(&self) -> PathBuf {
        self.config.upload_dir.clone()
    }

    /// Filenames currently in the upload directory, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = match std::fs::read_dir(self.upload_dir()) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}

/// Build a test `ServerConfig` rooted in `dir`.
pub fn test_config(dir: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        upload_dir: dir.path().join("uploads"),
        history_file: dir.path().join("history.json"),
        history_capacity: 50,
        max_upload_bytes: 10 * 1024 * 1024,
        download_timeout_secs: 30,
        job_timeout_secs: None,
        public_dir: dir.path().join("public"),
        fal: FalConfig {
            api_key: "test-key".to_string(),
            model: "fal-ai/flux-pro/kontext".to_string(),
            queue_url: "http://127.0.0.1:1".to_string(),
            poll_interval: Duration::from_millis(1),
        },
    }
}

/// Build the full application router around a fake service.
pub fn build_test_app(behavior: Behavior) -> TestApp {
    build_test_app_with(behavior, |_| {})
}

/// Like [`build_test_app`], letting the caller adjust configuration first.
pub fn build_test_app_with(behavior: Behavior, adjust: impl FnOnce(&mut ServerConfig)) -> TestApp {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    adjust(&mut config);

    let service = FakeService::new(behavior);
    let state = AppState::new(Arc::new(config.clone()), service.clone());
    let router = build_app_router(state.clone(), &config);

    TestApp {
        router,
        state,
        service,
        config,
        dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    send(app, Request::builder().method(Method::GET).uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: &TestApp, uri: &str) -> Response<Body> {
    send(app, Request::builder().method(Method::DELETE).uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "----restyle-test-boundary";

/// One multipart form part.
pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: Vec<u8>,
}

pub fn file_part<'a>(filename: &'a str, content_type: &'a str, data: Vec<u8>) -> Part<'a> {
    Part {
        name: "image",
        filename: Some(filename),
        content_type: Some(content_type),
        data,
    }
}

pub fn text_part<'a>(name: &'a str, value: &str) -> Part<'a> {
    Part {
        name,
        filename: None,
        content_type: None,
        data: value.as_bytes().to_vec(),
    }
}

/// Encode `parts` as a `multipart/form-data` body.
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(filename) = part.filename {
            disposition.push_str(&format!("; filename=\"{filename}\""));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(ct) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST a multipart form to `/api/transform-image`.
pub async fn post_transform(app: &TestApp, parts: &[Part<'_>]) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/transform-image")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}
