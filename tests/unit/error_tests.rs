// ============================
// tests/unit/error_tests.rs
// ============================
//! Tests for the error handling module

use axum::{
    body::to_bytes,
    http::{header, StatusCode},
    response::IntoResponse,
};
use warden_backend_lib::{auth::AuthFailure, error::AppError};

#[test]
fn test_error_codes() {
    assert_eq!(
        AppError::Unauthenticated(AuthFailure::MissingToken).error_code(),
        "AUTH_001"
    );
    assert_eq!(AppError::InvalidCredentials.error_code(), "AUTH_002");
    assert_eq!(AppError::Forbidden.error_code(), "AUTH_003");
    assert_eq!(AppError::RateLimitExceeded.error_code(), "RATE_001");
    assert_eq!(AppError::Conflict("email".into()).error_code(), "CONFLICT_001");
    assert_eq!(AppError::NotFound("task".into()).error_code(), "NF_001");
    assert_eq!(AppError::InvalidInput("title".into()).error_code(), "VAL_001");
    assert_eq!(AppError::Internal("boom".into()).error_code(), "INT_001");
}

#[test]
fn test_sanitized_messages_hide_details() {
    let err = AppError::Internal("db password is hunter2".to_string());
    assert!(!err.sanitized_message().contains("hunter2"));

    let err = AppError::Conflict("a@x.com".to_string());
    assert!(!err.sanitized_message().contains("a@x.com"));
}

#[test]
fn test_auth_failure_converts_to_unauthenticated() {
    let err: AppError = AuthFailure::WrongTokenType.into();
    assert!(matches!(
        err,
        AppError::Unauthenticated(AuthFailure::WrongTokenType)
    ));
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_anyhow_converts_to_internal() {
    let err: AppError = anyhow::anyhow!("disk full").into();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_error_response_shape() {
    let response = AppError::Forbidden.into_response();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "AUTH_003");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn test_every_auth_failure_renders_identically() {
    let mut bodies = Vec::new();
    for failure in [
        AuthFailure::MissingToken,
        AuthFailure::Expired,
        AuthFailure::Invalid,
        AuthFailure::WrongTokenType,
    ] {
        let response = AppError::Unauthenticated(failure).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
        bodies.push(to_bytes(response.into_body(), usize::MAX).await.unwrap());
    }
    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}
