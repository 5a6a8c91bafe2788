use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::api::AppJson;
use crate::db;
use crate::error::AppError;
use crate::models::{Course, NewCourseRequest, UpdateCourseRequest};
use crate::pagination::{Page, PageParams};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseFilter {
    department_id: Option<i64>,
    search_string: Option<String>,
}

pub async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
    Query(filter): Query<CourseFilter>,
) -> Result<Json<Page<Course>>, AppError> {
    params.validate()?;
    let page = db::courses::fetch_courses(
        &state.db,
        &params,
        filter.department_id,
        filter.search_string.as_deref(),
    )
    .await?;
    Ok(Json(page))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Course>, AppError> {
    let course = db::courses::find_course_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Course with ID {id} not found")))?;
    Ok(Json(course))
}

pub async fn create_course(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let course = db::courses::insert_course(&state.db, req).await?;
    let location = format!("/api/courses/{}", course.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(course),
    ))
}

pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    req.validate()?;
    let course = db::courses::update_course(&state.db, id, req).await?;
    Ok(Json(course))
}

pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db::courses::delete_course(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
