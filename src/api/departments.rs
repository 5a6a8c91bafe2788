use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::api::AppJson;
use crate::db;
use crate::error::AppError;
use crate::models::{Department, NewDepartmentRequest, UpdateDepartmentRequest};
use crate::pagination::{Page, PageParams};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentFilter {
    search_string: Option<String>,
}

pub async fn list_departments(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
    Query(filter): Query<DepartmentFilter>,
) -> Result<Json<Page<Department>>, AppError> {
    params.validate()?;
    let page =
        db::departments::fetch_departments(&state.db, &params, filter.search_string.as_deref())
            .await?;
    Ok(Json(page))
}

pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Department>, AppError> {
    let department = db::departments::find_department_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Department with ID {id} not found")))?;
    Ok(Json(department))
}

pub async fn create_department(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewDepartmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let department = db::departments::insert_department(&state.db, req).await?;
    let location = format!("/api/departments/{}", department.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(department),
    ))
}

pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<UpdateDepartmentRequest>,
) -> Result<Json<Department>, AppError> {
    req.validate()?;
    let department = db::departments::update_department(&state.db, id, req).await?;
    Ok(Json(department))
}

pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db::departments::delete_department(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
