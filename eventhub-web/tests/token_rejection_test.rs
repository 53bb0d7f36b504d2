//! Every kind of bad bearer token gets the same 401

mod helpers;

use axum::http::StatusCode;
use eventhub_applications::TokenIssuer;
use eventhub_core::AccountId;
use helpers::{event_body, register_and_login, request, send, test_app};
use serde_json::Value;

async fn assert_rejected(token: &str) -> Value {
    let app = test_app();
    let (status, body) = send(
        &app,
        request("POST", "/api/events", Some(event_body("Nope")), Some(token)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "token accepted: {}", token);
    body
}

#[tokio::test]
async fn test_missing_header() {
    let app = test_app();
    let (status, body) = send(&app, request("GET", "/api/users/me", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_garbage_token() {
    assert_rejected("not-a-token").await;
}

#[tokio::test]
async fn test_tampered_token() {
    let app = test_app();
    let (_, token) = register_and_login(&app, "alice@example.com").await;

    let mut tampered: Vec<char> = token.chars().collect();
    let middle = tampered.len() / 2;
    tampered[middle] = if tampered[middle] == 'A' { 'B' } else { 'A' };
    let tampered: String = tampered.into_iter().collect();

    let (status, _) = send(
        &app,
        request("GET", "/api/users/me", None, Some(&tampered)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_foreign_key_and_issuer_and_expiry_look_identical() {
    let foreign_key = TokenIssuer::new("some-other-key", "eventhub")
        .unwrap()
        .issue(AccountId(1))
        .unwrap();
    let foreign_issuer = TokenIssuer::new("web-test-signing-key", "someone-else")
        .unwrap()
        .issue(AccountId(1))
        .unwrap();
    let expired = TokenIssuer::new("web-test-signing-key", "eventhub")
        .unwrap()
        .issue_at(AccountId(1), chrono::Utc::now() - chrono::Duration::hours(2))
        .unwrap();

    let a = assert_rejected(&foreign_key.token).await;
    let b = assert_rejected(&foreign_issuer.token).await;
    let c = assert_rejected(&expired.token).await;
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[tokio::test]
async fn test_valid_token_from_same_keys_is_accepted() {
    let app = test_app();
    let (id, _) = register_and_login(&app, "alice@example.com").await;

    let token = TokenIssuer::new("web-test-signing-key", "eventhub")
        .unwrap()
        .issue(AccountId(id))
        .unwrap();
    let (status, me) = send(&app, request("GET", "/api/users/me", None, Some(&token.token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], id);
}
