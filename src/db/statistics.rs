use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDateGroup {
    pub enrollment_date: NaiveDate,
    pub student_count: i64,
}

/// Students grouped by the date they enrolled at the university, ascending.
pub async fn fetch_enrollment_by_date(
    db: &SqlitePool,
) -> Result<Vec<EnrollmentDateGroup>, AppError> {
    let groups = sqlx::query_as::<_, EnrollmentDateGroup>(
        "SELECT enrollment_date, COUNT(*) AS student_count \
         FROM students \
         GROUP BY enrollment_date \
         ORDER BY enrollment_date",
    )
    .fetch_all(db)
    .await?;
    Ok(groups)
}
