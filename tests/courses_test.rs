mod common;

use axum::http::StatusCode;
use common::{
    delete, get, post, put, seed_course, seed_department, seed_enrollment, seed_student, setup,
};
use serde_json::json;

#[tokio::test]
async fn create_returns_location_and_projection() {
    let (app, _pool) = setup().await;
    let department_id = seed_department(&app, "Chemistry").await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/courses")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            json!({
                "courseNumber": 3141,
                "title": "Trigonometry",
                "credits": 4,
                "departmentId": department_id,
            })
            .to_string(),
        ))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.clone(), request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let location = response
        .headers()
        .get(axum::http::header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_string();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(location, format!("/api/courses/{}", body["id"].as_i64().unwrap()));
    assert_eq!(body["courseNumber"], 3141);
    assert_eq!(body["departmentName"], "Chemistry");
    assert_eq!(body["enrollmentCount"], 0);
    assert_eq!(body["version"], 1);
}

#[tokio::test]
async fn duplicate_course_number_is_rejected_and_first_survives() {
    let (app, _pool) = setup().await;
    let department_id = seed_department(&app, "Chemistry").await;
    let first = seed_course(&app, 1045, "Calculus", department_id).await;

    let (status, body) = post(
        &app,
        "/api/courses",
        json!({
            "courseNumber": 1045,
            "title": "Another Calculus",
            "credits": 3,
            "departmentId": department_id,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("1045"));

    let (status, body) = get(&app, &format!("/api/courses/{first}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Calculus");

    let (_, body) = get(&app, "/api/courses").await;
    assert_eq!(body["totalCount"], 1);
}

#[tokio::test]
async fn create_against_missing_department_is_not_found() {
    let (app, _pool) = setup().await;

    let (status, body) = post(
        &app,
        "/api/courses",
        json!({ "courseNumber": 1045, "title": "Calculus", "credits": 3, "departmentId": 77 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("77"));
}

#[tokio::test]
async fn update_uses_version_token() {
    let (app, _pool) = setup().await;
    let department_id = seed_department(&app, "Chemistry").await;
    let id = seed_course(&app, 1045, "Calculus", department_id).await;

    let (status, body) = put(
        &app,
        &format!("/api/courses/{id}"),
        json!({ "title": "Calculus I", "credits": 4, "departmentId": department_id, "version": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Calculus I");
    assert_eq!(body["version"], 2);
    // business key is immutable
    assert_eq!(body["courseNumber"], 1045);

    let (status, _) = put(
        &app,
        &format!("/api/courses/{id}"),
        json!({ "title": "Calculus II", "credits": 4, "departmentId": department_id, "version": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = get(&app, &format!("/api/courses/{id}")).await;
    assert_eq!(body["title"], "Calculus I");
}

#[tokio::test]
async fn delete_is_blocked_while_enrollments_remain() {
    let (app, _pool) = setup().await;
    let department_id = seed_department(&app, "Chemistry").await;
    let course_id = seed_course(&app, 1045, "Calculus", department_id).await;
    let student_id = seed_student(&app, "Alonso", "Meredith").await;
    let enrollment_id = seed_enrollment(&app, student_id, course_id).await;

    let (status, body) = delete(&app, &format!("/api/courses/{course_id}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("1 enrollment(s)"));

    delete(&app, &format!("/api/enrollments/{enrollment_id}")).await;

    let (status, _) = delete(&app, &format!("/api/courses/{course_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn list_filters_by_department_and_title() {
    let (app, _pool) = setup().await;
    let chemistry = seed_department(&app, "Chemistry").await;
    let english = seed_department(&app, "English").await;
    seed_course(&app, 1045, "Calculus", chemistry).await;
    seed_course(&app, 2021, "Composition", english).await;
    seed_course(&app, 2042, "Literature", english).await;

    let (_, body) = get(&app, &format!("/api/courses?departmentId={english}")).await;
    assert_eq!(body["totalCount"], 2);

    let (_, body) = get(&app, "/api/courses?searchString=Comp").await;
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["data"][0]["title"], "Composition");

    // filters are conjunctive
    let (_, body) = get(&app, &format!("/api/courses?departmentId={chemistry}&searchString=Comp")).await;
    assert_eq!(body["totalCount"], 0);
}

#[tokio::test]
async fn credits_out_of_range_is_rejected() {
    let (app, _pool) = setup().await;
    let department_id = seed_department(&app, "Chemistry").await;

    let (status, body) = post(
        &app,
        "/api/courses",
        json!({ "courseNumber": 1045, "title": "Calculus", "credits": 6, "departmentId": department_id }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "credits");
}
