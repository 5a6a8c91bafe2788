#![allow(dead_code)]

use std::str::FromStr;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

use registrar::api::router;
use registrar::state::AppState;

/// One connection so every statement sees the same in-memory database.
pub async fn setup() -> (Router, SqlitePool) {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Failed to parse connect options")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let app = router(AppState { db: pool.clone() });
    (app, pool)
}

pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            builder.body(Body::from(body.to_string())).unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    request(app, "GET", uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    request(app, "POST", uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    request(app, "PUT", uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    request(app, "DELETE", uri, None).await
}

pub async fn seed_department(app: &Router, name: &str) -> i64 {
    let (status, body) = post(
        app,
        "/api/departments",
        json!({ "name": name, "budget": 350000.0, "startDate": "2015-09-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed department: {body}");
    body["id"].as_i64().unwrap()
}

pub async fn seed_course(app: &Router, number: i64, title: &str, department_id: i64) -> i64 {
    let (status, body) = post(
        app,
        "/api/courses",
        json!({
            "courseNumber": number,
            "title": title,
            "credits": 3,
            "departmentId": department_id,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed course: {body}");
    body["id"].as_i64().unwrap()
}

pub async fn seed_student(app: &Router, last_name: &str, first_mid_name: &str) -> i64 {
    let (status, body) = post(
        app,
        "/api/students",
        json!({
            "lastName": last_name,
            "firstMidName": first_mid_name,
            "enrollmentDate": "2023-09-01",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed student: {body}");
    body["id"].as_i64().unwrap()
}

pub async fn seed_instructor(app: &Router, last_name: &str, first_mid_name: &str) -> i64 {
    let (status, body) = post(
        app,
        "/api/instructors",
        json!({
            "lastName": last_name,
            "firstMidName": first_mid_name,
            "hireDate": "2010-01-15",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed instructor: {body}");
    body["id"].as_i64().unwrap()
}

pub async fn seed_enrollment(app: &Router, student_id: i64, course_id: i64) -> i64 {
    let (status, body) = post(
        app,
        "/api/enrollments",
        json!({ "studentId": student_id, "courseId": course_id }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed enrollment: {body}");
    body["id"].as_i64().unwrap()
}
