mod common;

use axum::http::StatusCode;
use common::{get, post, setup};
use serde_json::json;

async fn seed_student_on(app: &axum::Router, last_name: &str, date: &str) {
    let (status, _) = post(
        app,
        "/api/students",
        json!({ "lastName": last_name, "firstMidName": "Test", "enrollmentDate": date }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn students_are_grouped_by_enrollment_date_ascending() {
    let (app, _pool) = setup().await;
    seed_student_on(&app, "Alonso", "2023-09-01").await;
    seed_student_on(&app, "Barzdukas", "2023-09-01").await;
    seed_student_on(&app, "Norman", "2021-09-01").await;

    let (status, body) = get(&app, "/api/statistics/enrollment-by-date").await;
    assert_eq!(status, StatusCode::OK);

    let groups = body.as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["enrollmentDate"], "2021-09-01");
    assert_eq!(groups[0]["studentCount"], 1);
    assert_eq!(groups[1]["enrollmentDate"], "2023-09-01");
    assert_eq!(groups[1]["studentCount"], 2);
}

#[tokio::test]
async fn empty_university_has_no_groups() {
    let (app, _pool) = setup().await;

    let (status, body) = get(&app, "/api/statistics/enrollment-by-date").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}
