// ============================
// tests/integration/ownership_flow_tests.rs
// ============================
//! Cross-tenant access through the `/api/{user_id}` routes

use axum::http::{Method, StatusCode};
use serde_json::json;
use warden_common::Task;
use crate::test_utils::{register, send, setup_test_app, test_settings, TestRequest};

#[tokio::test]
async fn test_owner_manages_own_tasks() {
    let (app, _, _) = setup_test_app(test_settings());
    let a = register(&app, "a@x.com", "p1", "A").await;
    let tasks_uri = format!("/api/{}/tasks", a.user_id);

    let (status, body) = send(
        &app,
        TestRequest::new(Method::POST, &tasks_uri)
            .token(&a.access_token)
            .json(json!({ "title": "  write report ", "description": "quarterly" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let task: Task = serde_json::from_value(body).unwrap();
    assert_eq!(task.owner_id, a.user_id);
    assert_eq!(task.title, "write report");
    assert!(!task.completed);

    let task_uri = format!("{tasks_uri}/{}", task.id);
    let (status, body) = send(
        &app,
        TestRequest::new(Method::GET, &tasks_uri).token(&a.access_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        TestRequest::new(Method::PUT, &task_uri)
            .token(&a.access_token)
            .json(json!({ "title": "write summary" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "write summary");
    assert_eq!(body["description"], "quarterly");

    let complete_uri = format!("{task_uri}/complete");
    let (status, body) = send(
        &app,
        TestRequest::new(Method::PATCH, &complete_uri).token(&a.access_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed"], true);

    let (status, _) = send(
        &app,
        TestRequest::new(Method::DELETE, &task_uri).token(&a.access_token),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        TestRequest::new(Method::GET, &task_uri).token(&a.access_token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NF_001");
}

#[tokio::test]
async fn test_other_tenant_is_forbidden() {
    let (app, _, _) = setup_test_app(test_settings());
    let a = register(&app, "a@x.com", "p1", "A").await;
    let b = register(&app, "b@x.com", "p2", "B").await;

    let tasks_uri = format!("/api/{}/tasks", a.user_id);
    let (status, body) = send(
        &app,
        TestRequest::new(Method::POST, &tasks_uri)
            .token(&a.access_token)
            .json(json!({ "title": "private" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_uri = format!("{tasks_uri}/{}", body["id"].as_str().unwrap());

    let attempts = [
        (Method::GET, tasks_uri.clone(), None),
        (Method::POST, tasks_uri.clone(), Some(json!({ "title": "planted" }))),
        (Method::GET, task_uri.clone(), None),
        (Method::PUT, task_uri.clone(), Some(json!({ "completed": true }))),
        (Method::PATCH, format!("{task_uri}/complete"), None),
        (Method::DELETE, task_uri.clone(), None),
    ];
    for (method, uri, body) in attempts {
        let mut request = TestRequest::new(method.clone(), &uri).token(&b.access_token);
        if let Some(body) = body {
            request = request.json(body);
        }
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(body["error"]["code"], "AUTH_003");
    }

    // A's task is untouched.
    let (status, body) = send(
        &app,
        TestRequest::new(Method::GET, &task_uri).token(&a.access_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "private");
    assert_eq!(body["completed"], false);
}

#[tokio::test]
async fn test_unauthenticated_comes_before_ownership() {
    let (app, _, _) = setup_test_app(test_settings());
    let a = register(&app, "a@x.com", "p1", "A").await;

    let (status, _) = send(
        &app,
        TestRequest::new(Method::GET, &format!("/api/{}/tasks", a.user_id)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        TestRequest::new(Method::GET, &format!("/api/{}/tasks", a.user_id))
            .token("forged.token.value"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tasks_are_listed_per_owner() {
    let (app, _, _) = setup_test_app(test_settings());
    let a = register(&app, "a@x.com", "p1", "A").await;
    let b = register(&app, "b@x.com", "p2", "B").await;

    for (user, title) in [(&a, "a-1"), (&a, "a-2"), (&b, "b-1")] {
        let (status, _) = send(
            &app,
            TestRequest::new(Method::POST, &format!("/api/{}/tasks", user.user_id))
                .token(&user.access_token)
                .json(json!({ "title": title })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(
        &app,
        TestRequest::new(Method::GET, &format!("/api/{}/tasks", b.user_id)).token(&b.access_token),
    )
    .await;
    let titles: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["b-1"]);
}
