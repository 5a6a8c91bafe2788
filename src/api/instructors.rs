use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::api::AppJson;
use crate::db;
use crate::error::AppError;
use crate::models::{Instructor, NewInstructorRequest, UpdateInstructorRequest};
use crate::pagination::{Page, PageParams};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorFilter {
    search_string: Option<String>,
}

pub async fn list_instructors(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
    Query(filter): Query<InstructorFilter>,
) -> Result<Json<Page<Instructor>>, AppError> {
    params.validate()?;
    let page =
        db::instructors::fetch_instructors(&state.db, &params, filter.search_string.as_deref())
            .await?;
    Ok(Json(page))
}

pub async fn get_instructor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Instructor>, AppError> {
    let instructor = db::instructors::find_instructor_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Instructor with ID {id} not found")))?;
    Ok(Json(instructor))
}

pub async fn create_instructor(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewInstructorRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let instructor = db::instructors::insert_instructor(&state.db, req).await?;
    let location = format!("/api/instructors/{}", instructor.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(instructor),
    ))
}

pub async fn update_instructor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<UpdateInstructorRequest>,
) -> Result<Json<Instructor>, AppError> {
    req.validate()?;
    let instructor = db::instructors::update_instructor(&state.db, id, req).await?;
    Ok(Json(instructor))
}

pub async fn delete_instructor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db::instructors::delete_instructor(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
