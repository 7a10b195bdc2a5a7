//! Integration tests for the announcement board.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

use helpers::*;

fn notice(title: &str, course: &str, grade: i32, term: &str) -> Value {
    json!({
        "title": title,
        "content": format!("{title} details"),
        "course": course,
        "grade": grade,
        "semester": term,
    })
}

fn titles(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("array of notifications")
        .iter()
        .map(|n| n["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

async fn post(app: &TestApp, token: &str, body: Value) -> Value {
    let response = app.post_json("/api/notifications", Some(token), &body).await;
    assert_eq!(
        response.status,
        StatusCode::CREATED,
        "{}",
        String::from_utf8_lossy(&response.body)
    );
    response.json()
}

#[tokio::test]
async fn test_teacher_posts_and_everyone_reads() {
    let app = TestApp::new();
    let teacher = app.sign_in("suzuki-ichiro").await;
    let student = app.sign_in("2024P001").await;

    let created = post(
        &app,
        &teacher,
        json!({
            "title": "  Midterm  ",
            "content": "Room 301",
            "course": "Physics",
            "grade": "2",
            "semester": "前期",
            "repositoryLink": "https://github.com/example/physics",
        }),
    )
    .await;
    assert_eq!(created["title"], "Midterm");
    assert_eq!(created["grade"], 2);
    assert_eq!(created["authorId"], "suzuki-ichiro");
    assert!(created["id"].as_str().is_some());
    assert!(created["createdAt"].as_str().is_some());

    let listed = app.get("/api/notifications", Some(&student)).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(titles(&listed.json()), vec!["Midterm"]);
}

#[tokio::test]
async fn test_filters_compose_conjunctively() {
    let app = TestApp::new();
    let teacher = app.sign_in("suzuki-ichiro").await;

    post(&app, &teacher, notice("a", "Physics", 2, "前期")).await;
    post(&app, &teacher, notice("b", "Physics", 3, "前期")).await;
    post(&app, &teacher, notice("c", "Physics", 2, "後期")).await;
    post(&app, &teacher, notice("d", "Chemistry", 2, "前期")).await;

    let all = format!(
        "/api/notifications?course=Physics&grade=2&semester={}",
        encode_query("前期")
    );
    assert_eq!(titles(&app.get(&all, Some(&teacher)).await.json()), vec!["a"]);

    let mut physics = titles(
        &app.get("/api/notifications?course=Physics", Some(&teacher))
            .await
            .json(),
    );
    physics.sort();
    assert_eq!(physics, vec!["a", "b", "c"]);

    let mut second_grade = titles(&app.get("/api/notifications?grade=2", Some(&teacher)).await.json());
    second_grade.sort();
    assert_eq!(second_grade, vec!["a", "c", "d"]);

    let blank = app
        .get("/api/notifications?course=&grade=", Some(&teacher))
        .await;
    assert_eq!(titles(&blank.json()).len(), 4);
}

#[tokio::test]
async fn test_newest_first() {
    let app = TestApp::new();
    let teacher = app.sign_in("suzuki-ichiro").await;

    post(&app, &teacher, notice("first", "Physics", 2, "前期")).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    post(&app, &teacher, notice("second", "Physics", 2, "前期")).await;

    let listed = app.get("/api/notifications", Some(&teacher)).await.json();
    assert_eq!(titles(&listed), vec!["second", "first"]);
}

#[tokio::test]
async fn test_delete_removes_only_that_notification() {
    let app = TestApp::new();
    let teacher = app.sign_in("suzuki-ichiro").await;

    let keep = post(&app, &teacher, notice("keep", "Physics", 2, "前期")).await;
    let gone = post(&app, &teacher, notice("gone", "Physics", 2, "前期")).await;
    let gone_id = gone["id"].as_str().unwrap();

    let deleted = app
        .delete(&format!("/api/notifications/{gone_id}"), Some(&teacher))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let listed = app.get("/api/notifications", Some(&teacher)).await.json();
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|n| n["id"].as_str())
        .collect();
    assert_eq!(ids, vec![keep["id"].as_str().unwrap()]);

    let again = app
        .delete(&format!("/api/notifications/{gone_id}"), Some(&teacher))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_students_cannot_post_or_delete() {
    let app = TestApp::new();
    let teacher = app.sign_in("suzuki-ichiro").await;
    let student = app.sign_in("2024P001").await;
    let created = post(&app, &teacher, notice("exam", "Physics", 2, "前期")).await;

    let posted = app
        .post_json(
            "/api/notifications",
            Some(&student),
            &notice("fake", "Physics", 2, "前期"),
        )
        .await;
    assert_eq!(posted.status, StatusCode::FORBIDDEN);

    let deleted = app
        .delete(
            &format!("/api/notifications/{}", created["id"].as_str().unwrap()),
            Some(&student),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::FORBIDDEN);

    let listed = app.get("/api/notifications", Some(&student)).await.json();
    assert_eq!(titles(&listed), vec!["exam"]);
}

#[tokio::test]
async fn test_create_validation() {
    let app = TestApp::new();
    let teacher = app.sign_in("suzuki-ichiro").await;

    let mut missing_title = notice("", "Physics", 2, "前期");
    missing_title["title"] = json!("");
    let response = app
        .post_json("/api/notifications", Some(&teacher), &missing_title)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Title is required");

    let mut bad_link = notice("exam", "Physics", 2, "前期");
    bad_link["repositoryLink"] = json!("not a url");
    let response = app
        .post_json("/api/notifications", Some(&teacher), &bad_link)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Repository link must be a valid URL");

    let bad_term = notice("exam", "Physics", 2, "spring");
    let response = app
        .post_json("/api/notifications", Some(&teacher), &bad_term)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
