use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::api::AppJson;
use crate::db;
use crate::error::AppError;
use crate::models::{NewStudentRequest, Student, UpdateStudentRequest};
use crate::pagination::{Page, PageParams};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFilter {
    search_string: Option<String>,
}

pub async fn list_students(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
    Query(filter): Query<StudentFilter>,
) -> Result<Json<Page<Student>>, AppError> {
    params.validate()?;
    let page =
        db::students::fetch_students(&state.db, &params, filter.search_string.as_deref()).await?;
    Ok(Json(page))
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Student>, AppError> {
    let student = db::students::find_student_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student with ID {id} not found")))?;
    Ok(Json(student))
}

pub async fn create_student(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let student = db::students::insert_student(&state.db, req).await?;
    let location = format!("/api/students/{}", student.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(student),
    ))
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<UpdateStudentRequest>,
) -> Result<Json<Student>, AppError> {
    req.validate()?;
    let student = db::students::update_student(&state.db, id, req).await?;
    Ok(Json(student))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db::students::delete_student(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
