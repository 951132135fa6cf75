// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use wellness_tracker::error::AppError;

async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_not_found_carries_details() {
    let (status, body) = render(AppError::NotFound("User u1 not found".to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["details"], "User u1 not found");
}

#[tokio::test]
async fn test_server_errors_are_opaque() {
    let cases = [
        (
            AppError::Database("connection refused to 10.0.0.3".to_string()),
            "database_error",
        ),
        (
            AppError::MalformedPayload("expected object".to_string()),
            "internal_error",
        ),
        (
            AppError::Internal(anyhow::anyhow!("stack trace here")),
            "internal_error",
        ),
    ];

    for (err, code) in cases {
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], code);
        assert!(body.get("details").is_none());
    }
}

#[tokio::test]
async fn test_notification_failure_is_bad_gateway() {
    let (status, body) = render(AppError::Notification("503 from gateway".to_string())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "notification_error");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_auth_errors() {
    let (status, body) = render(AppError::Unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = render(AppError::BadRequest("bad email".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
