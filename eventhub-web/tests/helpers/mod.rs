//! Shared helpers for router-level tests

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use eventhub_core::{AppConfig, AuthConfig};
use eventhub_web::{create_app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const PASSWORD: &str = "Abcdef12";

pub fn test_app() -> Router {
    let config = AppConfig {
        auth: AuthConfig::new("web-test-encryption-key", "web-test-signing-key", "eventhub"),
        ..AppConfig::default()
    };
    create_app(AppState::new(config).unwrap())
}

/// Build a request with an optional JSON body and bearer token
pub fn request(method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request and decode the JSON body (Null when empty)
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Register an account and log it in, returning (account id, token)
pub async fn register_and_login(app: &Router, email: &str) -> (i64, String) {
    let (status, profile) = send(
        app,
        request(
            "POST",
            "/api/users",
            Some(json!({
                "email": email,
                "password": PASSWORD,
                "name_surname": "Test User",
                "birth_date": "1990-04-01"
            })),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", profile);

    let (status, session) = send(
        app,
        request(
            "POST",
            "/api/users/login",
            Some(json!({ "email": email, "password": PASSWORD })),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", session);

    (
        profile["id"].as_i64().unwrap(),
        session["token"].as_str().unwrap().to_string(),
    )
}

pub fn event_body(title: &str) -> Value {
    json!({
        "title": title,
        "start_date": "2099-06-01T18:00:00Z",
        "end_date": "2099-06-01T21:00:00Z",
        "short_description": "Evening meetup",
        "long_description": "Talks and networking"
    })
}
