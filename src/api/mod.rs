pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod instructors;
pub mod statistics;
pub mod students;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/students",
            get(students::list_students).post(students::create_student),
        )
        .route(
            "/api/students/{id}",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .route(
            "/api/courses",
            get(courses::list_courses).post(courses::create_course),
        )
        .route(
            "/api/courses/{id}",
            get(courses::get_course)
                .put(courses::update_course)
                .delete(courses::delete_course),
        )
        .route(
            "/api/departments",
            get(departments::list_departments).post(departments::create_department),
        )
        .route(
            "/api/departments/{id}",
            get(departments::get_department)
                .put(departments::update_department)
                .delete(departments::delete_department),
        )
        .route(
            "/api/instructors",
            get(instructors::list_instructors).post(instructors::create_instructor),
        )
        .route(
            "/api/instructors/{id}",
            get(instructors::get_instructor)
                .put(instructors::update_instructor)
                .delete(instructors::delete_instructor),
        )
        .route(
            "/api/enrollments",
            get(enrollments::list_enrollments).post(enrollments::create_enrollment),
        )
        .route(
            "/api/enrollments/{id}",
            get(enrollments::get_enrollment)
                .put(enrollments::update_enrollment)
                .delete(enrollments::delete_enrollment),
        )
        .route(
            "/api/statistics/enrollment-by-date",
            get(statistics::enrollment_by_date),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

/// Json extractor that reports malformed bodies as a 400 with the standard
/// error shape instead of axum's default 422.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}
