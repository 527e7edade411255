// ============================
// tests/integration/auth_flow_tests.rs
// ============================
//! End-to-end account flows through the router

use axum::http::{header, Method, StatusCode};
use chrono::Duration;
use serde_json::json;
use warden_backend_lib::config::{MAX_TOKEN_TTL_SECS, MAX_WINDOW_SECS};
use crate::test_utils::{register, send, send_full, setup_test_app, test_settings, TestRequest};

#[tokio::test]
async fn test_health_is_open() {
    let (app, _, _) = setup_test_app(test_settings());
    let (status, _) = send(&app, TestRequest::new(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_returns_tokens_and_rejects_duplicates() {
    let (app, _, _) = setup_test_app(test_settings());

    let registered = register(&app, "a@x.com", "p1", "A").await;
    assert_eq!(registered.email, "a@x.com");
    assert_eq!(registered.name, "A");
    assert!(!registered.user_id.is_empty());
    assert!(!registered.access_token.is_empty());
    assert!(!registered.refresh_token.is_empty());

    let (status, body) = send(
        &app,
        TestRequest::new(Method::POST, "/auth/register").json(json!({
            "email": "A@X.com",
            "password": "other",
            "name": "Other",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT_001");
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let (app, _, _) = setup_test_app(test_settings());

    for body in [
        json!({ "email": "not-an-email", "password": "p1", "name": "A" }),
        json!({ "email": "a@x.com", "password": "", "name": "A" }),
        json!({ "email": "a@x.com", "password": "p1", "name": "   " }),
    ] {
        let (status, body) = send(
            &app,
            TestRequest::new(Method::POST, "/auth/register").json(body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VAL_001");
    }
}

#[tokio::test]
async fn test_login_checks_password() {
    let (app, _, _) = setup_test_app(test_settings());
    let registered = register(&app, "a@x.com", "p1", "A").await;

    let (status, body) = send(
        &app,
        TestRequest::new(Method::POST, "/auth/login")
            .json(json!({ "email": "a@x.com", "password": "p1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], registered.user_id.as_str());
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());

    let (status, wrong_password) = send(
        &app,
        TestRequest::new(Method::POST, "/auth/login")
            .json(json!({ "email": "a@x.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_account) = send(
        &app,
        TestRequest::new(Method::POST, "/auth/login")
            .json(json!({ "email": "nobody@x.com", "password": "p1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_account);
}

#[tokio::test]
async fn test_me_requires_a_valid_access_token() {
    let (app, _, _) = setup_test_app(test_settings());
    let registered = register(&app, "a@x.com", "p1", "A").await;

    let (status, headers, _) = send_full(&app, TestRequest::new(Method::GET, "/auth/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");

    let (status, body) = send(
        &app,
        TestRequest::new(Method::GET, "/auth/me").token(&registered.access_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], registered.user_id.as_str());
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["name"], "A");

    // A refresh token is not an access token.
    let (status, _) = send(
        &app,
        TestRequest::new(Method::GET, "/auth/me").token(&registered.refresh_token),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_issues_a_working_access_token() {
    let (app, _, clock) = setup_test_app(test_settings());
    let registered = register(&app, "a@x.com", "p1", "A").await;

    // Session access tokens live 30 minutes.
    clock.advance(Duration::minutes(30));
    let (status, _) = send(
        &app,
        TestRequest::new(Method::GET, "/auth/me").token(&registered.access_token),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        TestRequest::new(Method::POST, "/auth/refresh")
            .json(json!({ "refresh_token": registered.refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["access_token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        TestRequest::new(Method::GET, "/auth/me").token(&access),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], registered.user_id.as_str());

    // Renewed tokens use the 15 minute default.
    clock.advance(Duration::minutes(15));
    let (status, _) = send(&app, TestRequest::new(Method::GET, "/auth/me").token(&access)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rejects_bad_tokens() {
    let (app, _, _) = setup_test_app(test_settings());
    let registered = register(&app, "a@x.com", "p1", "A").await;

    for token in ["garbage", registered.access_token.as_str()] {
        let (status, body) = send(
            &app,
            TestRequest::new(Method::POST, "/auth/refresh").json(json!({ "refresh_token": token })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "AUTH_001");
    }
}

#[tokio::test]
async fn test_expired_and_forged_tokens_are_indistinguishable() {
    let settings = test_settings();
    let (app, _, clock) = setup_test_app(settings.clone());
    let registered = register(&app, "a@x.com", "p1", "A").await;

    let mut foreign = settings;
    foreign.auth.secret = "someone-elses-secret-someone-elses!!".to_string();
    let (other_app, _, _) = setup_test_app(foreign);
    let forged = register(&other_app, "a@x.com", "p1", "A").await;

    let (forged_status, forged_body) = send(
        &app,
        TestRequest::new(Method::GET, "/auth/me").token(&forged.access_token),
    )
    .await;

    clock.advance(Duration::hours(1));
    let (expired_status, expired_body) = send(
        &app,
        TestRequest::new(Method::GET, "/auth/me").token(&registered.access_token),
    )
    .await;

    assert_eq!(forged_status, StatusCode::UNAUTHORIZED);
    assert_eq!(expired_status, StatusCode::UNAUTHORIZED);
    assert_eq!(forged_body, expired_body);
}

#[tokio::test]
async fn test_longest_allowed_lifetimes_still_serve() {
    let mut settings = test_settings();
    settings.auth.access_ttl_secs = MAX_TOKEN_TTL_SECS;
    settings.auth.session_access_ttl_secs = MAX_TOKEN_TTL_SECS;
    settings.auth.refresh_ttl_secs = MAX_TOKEN_TTL_SECS;
    settings.rate_limit.window_secs = MAX_WINDOW_SECS;
    settings.auth_rate_limit.window_secs = MAX_WINDOW_SECS;
    let (app, _, _) = setup_test_app(settings);

    let registered = register(&app, "a@x.com", "p1", "A").await;
    let (status, _) = send(
        &app,
        TestRequest::new(Method::GET, "/auth/me").token(&registered.access_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        TestRequest::new(Method::POST, "/auth/refresh")
            .json(json!({ "refresh_token": registered.refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
