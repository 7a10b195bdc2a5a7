//! Integration tests for the video upload endpoint.

mod helpers;

use axum::http::StatusCode;
use helpers::*;

#[tokio::test]
async fn test_teacher_upload_is_served_back_byte_for_byte() {
    let app = TestApp::new();
    let token = app.sign_in("suzuki-ichiro").await;
    let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();

    let response = app
        .upload(Some(&token), "video", "week 1 (intro).mp4", "video/mp4", &data)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let url = response.json()["videoUrl"]
        .as_str()
        .expect("videoUrl in response")
        .to_string();
    assert!(url.starts_with("/videos/"));
    assert!(url.ends_with("-week_1__intro_.mp4"), "unexpected url {url}");

    let served = app.get(&url, None).await;
    assert_eq!(served.status, StatusCode::OK);
    assert_eq!(served.body.as_ref(), data.as_slice());
}

#[tokio::test]
async fn test_non_video_rejected_and_nothing_written() {
    let app = TestApp::new();
    let token = app.sign_in("suzuki-ichiro").await;

    let response = app
        .upload(Some(&token), "video", "notes.pdf", "application/pdf", b"%PDF-1.7")
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Not a video file");
    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn test_oversized_upload_rejected_and_cleaned_up() {
    let app = TestApp::with_upload_limit(1024);
    let token = app.sign_in("suzuki-ichiro").await;

    let response = app
        .upload(Some(&token), "video", "long.mp4", "video/mp4", &[7u8; 1025])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "File too large");
    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn test_upload_at_exact_limit_accepted() {
    let app = TestApp::with_upload_limit(1024);
    let token = app.sign_in("suzuki-ichiro").await;

    let response = app
        .upload(Some(&token), "video", "exact.webm", "video/webm", &[1u8; 1024])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.stored_file_count(), 1);
}

#[tokio::test]
async fn test_missing_video_field() {
    let app = TestApp::new();
    let token = app.sign_in("suzuki-ichiro").await;

    let response = app
        .upload(Some(&token), "attachment", "clip.mp4", "video/mp4", b"frames")
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "No file uploaded");
    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn test_student_cannot_upload() {
    let app = TestApp::new();
    let token = app.sign_in("2024P001").await;

    let response = app
        .upload(Some(&token), "video", "clip.mp4", "video/mp4", b"frames")
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn test_anonymous_upload_unauthorized() {
    let app = TestApp::new();

    let response = app
        .upload(None, "video", "clip.mp4", "video/mp4", b"frames")
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn test_type_checked_before_body_cap() {
    let app = TestApp::with_upload_limit(1024);
    let token = app.sign_in("suzuki-ichiro").await;

    // Far past the body cap and delivered as a single frame.
    let response = app
        .upload(Some(&token), "video", "notes.pdf", "application/pdf", &vec![0u8; 300_000])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Not a video file");
    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn test_video_past_body_cap_too_large() {
    let app = TestApp::with_upload_limit(1024);
    let token = app.sign_in("suzuki-ichiro").await;

    let response = app
        .upload(Some(&token), "video", "huge.mp4", "video/mp4", &vec![0u8; 300_000])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "File too large");
    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn test_staging_directory_not_served() {
    let app = TestApp::new();
    let staging = app.video_dir.join(portal_storage::STAGING_DIR);
    std::fs::create_dir_all(&staging).unwrap();
    std::fs::write(staging.join("1-left.mp4.part"), b"partial").unwrap();
    std::fs::write(app.video_dir.join("1-done.mp4"), b"complete").unwrap();

    for uri in [
        "/videos/.incoming/1-left.mp4.part",
        "/videos/%2Eincoming/1-left.mp4.part",
    ] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
    }

    let done = app.get("/videos/1-done.mp4", None).await;
    assert_eq!(done.status, StatusCode::OK);
    assert_eq!(done.body.as_ref(), b"complete");
}
