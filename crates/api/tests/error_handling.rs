//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly; no router is involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use restyle_api::engine::orchestrator::TransformError;
use restyle_api::error::AppError;
use restyle_core::error::CoreError;
use restyle_store::StoreError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "History item",
        id: "42".into(),
    });

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "History item not found");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Transform(TransformError::Validation("No prompt provided".into()));

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "No prompt provided");
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn upstream_error_returns_500_with_details() {
    let err = AppError::Transform(TransformError::Upstream("No generated image received".into()));

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to process image with AI");
    assert_eq!(json["details"], "No generated image received");
}

#[tokio::test]
async fn download_error_returns_500_with_details() {
    let err = AppError::Transform(TransformError::Download("Image download timed out after 30s".into()));

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "DOWNLOAD_ERROR");
    assert_eq!(json["details"], "Image download timed out after 30s");
}

#[tokio::test]
async fn io_error_is_sanitized() {
    let err = AppError::Transform(TransformError::Io("/srv/secret/path: permission denied".into()));

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "IO_ERROR");
    assert!(!json.to_string().contains("secret"));
}

#[tokio::test]
async fn missing_asset_returns_404() {
    let err = AppError::Store(StoreError::NotFound("x.png".into()));

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "File not found");
}

#[tokio::test]
async fn storage_failure_returns_500_and_sanitizes_message() {
    let err = AppError::Store(StoreError::Io {
        path: "/srv/secret/history.json".into(),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    });

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
    assert!(!json.to_string().contains("secret"));
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid multipart body".into());

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid multipart body");
}
