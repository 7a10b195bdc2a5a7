//! Integration tests for playback progress and view counting.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::*;
use portal_entity::video::{Video, VideoSemester, VideoStatus};

fn lecture(app: &TestApp) -> Video {
    app.seed_video("Limits", "Calculus I", 1, VideoSemester::First, VideoStatus::Ready, 10)
}

#[tokio::test]
async fn test_no_record_starts_at_zero() {
    let app = TestApp::new();
    let video = lecture(&app);
    let token = app.sign_in("2024P001").await;

    let response = app
        .get(&format!("/api/progress/{}", video.id), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert!(body["progress"].is_null());
    assert_eq!(body["resumePosition"], 0.0);
}

#[tokio::test]
async fn test_checkpoint_then_resume() {
    let app = TestApp::new();
    let video = lecture(&app);
    let token = app.sign_in("2024P001").await;
    let uri = format!("/api/progress/{}", video.id);

    let saved = app.put_json(&uri, Some(&token), &json!({ "position": 42.5 })).await;
    assert_eq!(saved.status, StatusCode::OK);
    assert_eq!(saved.json()["lastPosition"], 42.5);
    assert_eq!(saved.json()["completed"], false);

    let loaded = app.get(&uri, Some(&token)).await.json();
    assert_eq!(loaded["resumePosition"], 42.5);
    assert_eq!(loaded["progress"]["userId"], "2024P001");
}

#[tokio::test]
async fn test_explicit_start_time_wins() {
    let app = TestApp::new();
    let video = lecture(&app);
    let token = app.sign_in("2024P001").await;
    let uri = format!("/api/progress/{}", video.id);

    app.put_json(&uri, Some(&token), &json!({ "position": 42.0 })).await;

    let shared = app.get(&format!("{uri}?startTime=90"), Some(&token)).await.json();
    assert_eq!(shared["resumePosition"], 90.0);

    // A zero start time is ignored.
    let zero = app.get(&format!("{uri}?startTime=0"), Some(&token)).await.json();
    assert_eq!(zero["resumePosition"], 42.0);
}

#[tokio::test]
async fn test_completed_record_starts_over_and_counts_one_view() {
    let app = TestApp::new();
    let video = lecture(&app);
    let token = app.sign_in("2024P001").await;
    let uri = format!("/api/progress/{}", video.id);

    app.put_json(&uri, Some(&token), &json!({ "position": 500.0 })).await;
    let done = app
        .post_json(&format!("{uri}/complete"), Some(&token), &json!({ "duration": 600.0 }))
        .await;
    assert_eq!(done.status, StatusCode::OK);
    let body = done.json();
    assert_eq!(body["viewCount"], 1);
    assert_eq!(body["progress"]["completed"], true);
    assert_eq!(body["progress"]["lastPosition"], 600.0);

    let loaded = app.get(&uri, Some(&token)).await.json();
    assert_eq!(loaded["resumePosition"], 0.0);

    let catalog = app
        .get(&format!("/api/videos/{}", video.id), Some(&token))
        .await
        .json();
    assert_eq!(catalog["viewCount"], 1);
}

#[tokio::test]
async fn test_each_completion_adds_exactly_one_view() {
    let app = TestApp::new();
    let video = lecture(&app);
    let student = app.sign_in("2024P001").await;
    let other = app.sign_in("2024P002").await;
    let complete = format!("/api/progress/{}/complete", video.id);

    for token in [&student, &other, &student] {
        app.post_json(&complete, Some(token), &json!({ "duration": 600.0 }))
            .await;
    }

    let catalog = app
        .get(&format!("/api/videos/{}", video.id), Some(&student))
        .await
        .json();
    assert_eq!(catalog["viewCount"], 3);
}

#[tokio::test]
async fn test_progress_is_per_user() {
    let app = TestApp::new();
    let video = lecture(&app);
    let first = app.sign_in("2024P001").await;
    let second = app.sign_in("2024P002").await;
    let uri = format!("/api/progress/{}", video.id);

    app.put_json(&uri, Some(&first), &json!({ "position": 120.0 })).await;

    let theirs = app.get(&uri, Some(&second)).await.json();
    assert!(theirs["progress"].is_null());
    assert_eq!(theirs["resumePosition"], 0.0);
}

#[tokio::test]
async fn test_progress_errors() {
    let app = TestApp::new();
    let video = lecture(&app);
    let token = app.sign_in("2024P001").await;

    let negative = app
        .put_json(
            &format!("/api/progress/{}", video.id),
            Some(&token),
            &json!({ "position": -1.0 }),
        )
        .await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);

    let unknown = app
        .put_json(
            &format!("/api/progress/{}", uuid::Uuid::new_v4()),
            Some(&token),
            &json!({ "position": 1.0 }),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let anonymous = app.get(&format!("/api/progress/{}", video.id), None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}
