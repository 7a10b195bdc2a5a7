//! Integration tests for sign-in, sessions, and role derivation.

mod helpers;

use axum::http::StatusCode;
use helpers::*;

#[tokio::test]
async fn test_sign_in_derives_role_from_local_part() {
    let app = TestApp::new();

    for (local_part, role) in [
        ("2024P001", "student"),
        ("yamada-taro", "teacher"),
        ("x1y2", "unknown"),
    ] {
        let email = format!("{local_part}@{DOMAIN}");
        let response = app.sign_in_raw(&id_token(local_part, &email)).await;
        assert_eq!(response.status, StatusCode::OK);

        let body = response.json();
        assert_eq!(body["user"]["role"], role, "role for {local_part}");
        assert_eq!(body["user"]["email"], email);
        assert_eq!(body["session"]["role"], role);
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    }
}

#[tokio::test]
async fn test_foreign_domain_gets_no_session() {
    let app = TestApp::new();

    let response = app
        .sign_in_raw(&id_token("outsider", "yamada-taro@gmail.com"))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.error(),
        "Please sign in with an @example.ac.jp email address."
    );
    assert!(response.json().get("token").is_none());
    assert_eq!(app.state.sessions.len(), 0);

    // The same provider token is refused afterwards.
    let retry = app
        .sign_in_raw(&id_token("outsider", "yamada-taro@gmail.com"))
        .await;
    assert_ne!(retry.status, StatusCode::OK);
}

#[tokio::test]
async fn test_lookalike_domain_rejected() {
    let app = TestApp::new();
    let response = app
        .sign_in_raw(&id_token("uid-z", "yamada-taro@example.ac.jp.evil.com"))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invalid_id_token_unauthorized() {
    let app = TestApp::new();
    let response = app.sign_in_raw("not-a-jwt").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_blank_id_token_is_validation_error() {
    let app = TestApp::new();
    let response = app.sign_in_raw("").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_and_profile() {
    let app = TestApp::new();
    let token = app.sign_in("yamada-taro").await;

    let session = app.get("/api/auth/session", Some(&token)).await;
    assert_eq!(session.status, StatusCode::OK);
    assert_eq!(session.json()["userId"], "yamada-taro");

    let profile = app.get("/api/users/me", Some(&token)).await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.json()["role"], "teacher");
}

#[tokio::test]
async fn test_sign_out_ends_session() {
    let app = TestApp::new();
    let token = app.sign_in("2024P001").await;

    let response = app
        .post_json("/api/auth/sign-out", Some(&token), &serde_json::json!({}))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let after = app.get("/api/auth/session", Some(&token)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_need_a_token() {
    let app = TestApp::new();

    let missing = app.get("/api/videos", None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.error(), "Missing Authorization header");

    let garbage = app.get("/api/videos", Some("garbage")).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();
    let response = app.get("/api/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["database"], "connected");
    assert_eq!(body["storage"], "available");
    assert_eq!(body["storageProvider"], "local");
}
