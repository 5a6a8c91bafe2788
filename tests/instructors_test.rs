mod common;

use axum::http::StatusCode;
use common::{delete, get, post, put, seed_course, seed_department, seed_instructor, setup};
use serde_json::json;

#[tokio::test]
async fn create_with_office_and_assignments() {
    let (app, _pool) = setup().await;
    let department_id = seed_department(&app, "Chemistry").await;
    let calculus = seed_course(&app, 1045, "Calculus", department_id).await;
    let botany = seed_course(&app, 2042, "Botany", department_id).await;

    let (status, body) = post(
        &app,
        "/api/instructors",
        json!({
            "lastName": "Kapoor",
            "firstMidName": "Candace",
            "hireDate": "2001-01-15",
            "officeLocation": "Thompson 304",
            "courseIds": [calculus, botany],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["fullName"], "Kapoor, Candace");
    assert_eq!(body["officeLocation"], "Thompson 304");

    let assignments = body["courseAssignments"].as_array().unwrap();
    assert_eq!(assignments.len(), 2);
    assert_eq!(assignments[0]["courseNumber"], 1045);
    assert_eq!(assignments[0]["courseTitle"], "Calculus");
    assert_eq!(assignments[0]["departmentName"], "Chemistry");
    assert_eq!(assignments[1]["courseNumber"], 2042);
}

#[tokio::test]
async fn unknown_course_ids_are_ignored_on_assignment() {
    let (app, _pool) = setup().await;
    let department_id = seed_department(&app, "Chemistry").await;
    let calculus = seed_course(&app, 1045, "Calculus", department_id).await;

    let (status, body) = post(
        &app,
        "/api/instructors",
        json!({
            "lastName": "Zheng",
            "firstMidName": "Roger",
            "hireDate": "2004-02-12",
            "courseIds": [calculus, 9999],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["courseAssignments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_replaces_office_and_assignment_set() {
    let (app, pool) = setup().await;
    let department_id = seed_department(&app, "Chemistry").await;
    let calculus = seed_course(&app, 1045, "Calculus", department_id).await;
    let botany = seed_course(&app, 2042, "Botany", department_id).await;

    let (_, body) = post(
        &app,
        "/api/instructors",
        json!({
            "lastName": "Fakhouri",
            "firstMidName": "Fadi",
            "hireDate": "2002-07-06",
            "officeLocation": "Smith 17",
            "courseIds": [calculus],
        }),
    )
    .await;
    let id = body["id"].as_i64().unwrap();

    let (status, body) = put(
        &app,
        &format!("/api/instructors/{id}"),
        json!({
            "lastName": "Fakhouri",
            "firstMidName": "Fadi",
            "hireDate": "2002-07-06",
            "officeLocation": null,
            "courseIds": [botany],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["officeLocation"], serde_json::Value::Null);
    let assignments = body["courseAssignments"].as_array().unwrap();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0]["courseTitle"], "Botany");

    // clearing the office removes the row, not just the projection
    let office_rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM office_assignments WHERE instructor_id = ?")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(office_rows, 0);
}

#[tokio::test]
async fn delete_is_blocked_while_administering_a_department() {
    let (app, _pool) = setup().await;
    let instructor_id = seed_instructor(&app, "Abercrombie", "Kim").await;

    let (status, body) = post(
        &app,
        "/api/departments",
        json!({
            "name": "Economics",
            "budget": 100000.0,
            "startDate": "2007-09-01",
            "instructorId": instructor_id,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let department_id = body["id"].as_i64().unwrap();

    let (status, body) = delete(&app, &format!("/api/instructors/{instructor_id}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("department administrator"));

    let (status, _) = put(
        &app,
        &format!("/api/departments/{department_id}"),
        json!({
            "name": "Economics",
            "budget": 100000.0,
            "startDate": "2007-09-01",
            "instructorId": null,
            "version": 1,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = delete(&app, &format!("/api/instructors/{instructor_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn deleting_an_instructor_cascades_the_office_row() {
    let (app, pool) = setup().await;

    let (_, body) = post(
        &app,
        "/api/instructors",
        json!({
            "lastName": "Harui",
            "firstMidName": "Roger",
            "hireDate": "1998-07-01",
            "officeLocation": "Gowan 27",
        }),
    )
    .await;
    let id = body["id"].as_i64().unwrap();

    let (status, _) = delete(&app, &format!("/api/instructors/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let office_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM office_assignments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(office_rows, 0);
}

#[tokio::test]
async fn instructor_search_matches_either_name() {
    let (app, _pool) = setup().await;
    seed_instructor(&app, "Abercrombie", "Kim").await;
    seed_instructor(&app, "Fakhouri", "Fadi").await;
    seed_instructor(&app, "Kapoor", "Candace").await;

    let (_, body) = get(&app, "/api/instructors?searchString=Fa").await;
    // "Fakhouri" and "Fadi" are the same row; "Candace" misses
    assert_eq!(body["totalCount"], 1);

    let (_, body) = get(&app, "/api/instructors?searchString=K").await;
    assert_eq!(body["totalCount"], 2);
}

#[tokio::test]
async fn empty_names_are_rejected() {
    let (app, _pool) = setup().await;

    let (status, body) = post(
        &app,
        "/api/instructors",
        json!({ "lastName": "", "firstMidName": "Kim", "hireDate": "1995-03-11" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "lastName");
}
