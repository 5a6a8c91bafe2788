use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::api::AppJson;
use crate::db;
use crate::error::AppError;
use crate::models::{Enrollment, NewEnrollmentRequest, UpdateEnrollmentRequest};
use crate::pagination::{Page, PageParams};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentFilter {
    student_id: Option<i64>,
    course_id: Option<i64>,
}

pub async fn list_enrollments(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
    Query(filter): Query<EnrollmentFilter>,
) -> Result<Json<Page<Enrollment>>, AppError> {
    params.validate()?;
    let page = db::enrollments::fetch_enrollments(
        &state.db,
        &params,
        filter.student_id,
        filter.course_id,
    )
    .await?;
    Ok(Json(page))
}

pub async fn get_enrollment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Enrollment>, AppError> {
    let enrollment = db::enrollments::find_enrollment_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Enrollment with ID {id} not found")))?;
    Ok(Json(enrollment))
}

pub async fn create_enrollment(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewEnrollmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let enrollment = db::enrollments::insert_enrollment(&state.db, req).await?;
    let location = format!("/api/enrollments/{}", enrollment.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(enrollment),
    ))
}

pub async fn update_enrollment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<UpdateEnrollmentRequest>,
) -> Result<Json<Enrollment>, AppError> {
    let enrollment = db::enrollments::update_enrollment(&state.db, id, req).await?;
    Ok(Json(enrollment))
}

pub async fn delete_enrollment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db::enrollments::delete_enrollment(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
