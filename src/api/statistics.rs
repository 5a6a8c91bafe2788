use axum::extract::State;
use axum::Json;

use crate::db;
use crate::db::statistics::EnrollmentDateGroup;
use crate::error::AppError;
use crate::state::AppState;

pub async fn enrollment_by_date(
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrollmentDateGroup>>, AppError> {
    let groups = db::statistics::fetch_enrollment_by_date(&state.db).await?;
    Ok(Json(groups))
}
