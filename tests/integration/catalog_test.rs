//! Integration tests for browsing, searching, and publishing videos.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

use helpers::*;
use portal_entity::video::{VideoSemester, VideoStatus};

fn titles(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("array of videos")
        .iter()
        .map(|v| v["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

fn seeded() -> TestApp {
    let app = TestApp::new();
    app.seed_video("Limits", "Calculus I", 1, VideoSemester::First, VideoStatus::Ready, 60);
    app.seed_video("Series", "Calculus II", 2, VideoSemester::Second, VideoStatus::Ready, 30);
    app.seed_video("Cells", "Biology", 1, VideoSemester::Second, VideoStatus::Ready, 20);
    app.seed_video("Draft derivatives", "Calculus I", 1, VideoSemester::First, VideoStatus::Processing, 1);
    app
}

#[tokio::test]
async fn test_recent_lists_ready_newest_first() {
    let app = seeded();
    let token = app.sign_in("2024P001").await;

    let response = app.get("/api/videos", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(titles(&response.json()), vec!["Cells", "Series", "Limits"]);
}

#[tokio::test]
async fn test_search_never_returns_processing_videos() {
    let app = seeded();
    let token = app.sign_in("2024P001").await;

    for uri in [
        "/api/videos/search",
        "/api/videos/search?lectureName=Calculus",
        "/api/videos/search?keyword=derivatives",
        "/api/videos/search?grade=1&semester=first",
    ] {
        let response = app.get(uri, Some(&token)).await;
        assert_eq!(response.status, StatusCode::OK, "{uri}");
        assert!(
            !titles(&response.json()).contains(&"Draft derivatives".to_string()),
            "{uri} returned a processing video"
        );
    }
}

#[tokio::test]
async fn test_search_filters_compose() {
    let app = seeded();
    let token = app.sign_in("2024P001").await;

    let by_prefix = app
        .get("/api/videos/search?lectureName=Calculus", Some(&token))
        .await;
    let mut found = titles(&by_prefix.json());
    found.sort();
    assert_eq!(found, vec!["Limits", "Series"]);

    let grade_and_semester = app
        .get("/api/videos/search?grade=1&semester=second", Some(&token))
        .await;
    assert_eq!(titles(&grade_and_semester.json()), vec!["Cells"]);

    let keyword = app
        .get("/api/videos/search?keyword=LIMITS", Some(&token))
        .await;
    assert_eq!(titles(&keyword.json()), vec!["Limits"]);

    let blank = app
        .get("/api/videos/search?grade=&lectureName=&keyword=", Some(&token))
        .await;
    assert_eq!(titles(&blank.json()).len(), 3);
}

#[tokio::test]
async fn test_search_prefix_is_case_sensitive() {
    let app = seeded();
    let token = app.sign_in("2024P001").await;

    let response = app
        .get("/api/videos/search?lectureName=calculus", Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(titles(&response.json()).is_empty());
}

#[tokio::test]
async fn test_search_rejects_bad_grade() {
    let app = seeded();
    let token = app.sign_in("2024P001").await;

    let response = app
        .get("/api/videos/search?grade=second", Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_video() {
    let app = seeded();
    let token = app.sign_in("2024P001").await;
    let video = app.seed_video("Optics", "Physics", 3, VideoSemester::First, VideoStatus::Ready, 5);

    let found = app.get(&format!("/api/videos/{}", video.id), Some(&token)).await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.json()["lectureName"], "Physics");

    let missing = app
        .get(&format!("/api/videos/{}", uuid::Uuid::new_v4()), Some(&token))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let malformed = app.get("/api/videos/not-an-id", Some(&token)).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_teacher_uploads_then_publishes() {
    let app = TestApp::new();
    let teacher = app.sign_in("suzuki-ichiro").await;

    let upload = app
        .upload(Some(&teacher), "video", "waves.mp4", "video/mp4", b"frames")
        .await;
    assert_eq!(upload.status, StatusCode::OK);
    let video_url = upload.json()["videoUrl"].as_str().unwrap().to_string();

    let published = app
        .post_json(
            "/api/videos",
            Some(&teacher),
            &json!({
                "title": "Waves",
                "description": "Standing waves",
                "lectureName": "Physics II",
                "grade": "2",
                "semester": "second",
                "videoUrl": video_url,
                "duration": 1200.5,
            }),
        )
        .await;
    assert_eq!(published.status, StatusCode::CREATED);
    let body = published.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["viewCount"], 0);
    assert_eq!(body["grade"], 2);
    assert_eq!(body["teacherEmail"], format!("suzuki-ichiro@{DOMAIN}"));

    let student = app.sign_in("2024P001").await;
    let recent = app.get("/api/videos", Some(&student)).await;
    assert_eq!(titles(&recent.json()), vec!["Waves"]);
}

#[tokio::test]
async fn test_publish_validation_and_role() {
    let app = TestApp::new();
    let teacher = app.sign_in("suzuki-ichiro").await;
    let student = app.sign_in("2024P001").await;
    let body = json!({
        "title": "Waves",
        "lectureName": "Physics II",
        "grade": 7,
        "semester": "second",
        "videoUrl": "/videos/1-waves.mp4",
    });

    let out_of_range = app.post_json("/api/videos", Some(&teacher), &body).await;
    assert_eq!(out_of_range.status, StatusCode::BAD_REQUEST);
    assert_eq!(out_of_range.error(), "Grade must be between 1 and 6");

    let forbidden = app.post_json("/api/videos", Some(&student), &body).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
}
