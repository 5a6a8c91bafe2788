use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use crate::models::require_text;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub last_name: String,
    pub first_mid_name: String,
    pub enrollment_date: NaiveDate,
    pub enrollment_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudentRequest {
    pub last_name: String,
    pub first_mid_name: String,
    pub enrollment_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub last_name: String,
    pub first_mid_name: String,
    pub enrollment_date: NaiveDate,
}

impl NewStudentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_names(&self.last_name, &self.first_mid_name)
    }
}

impl UpdateStudentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_names(&self.last_name, &self.first_mid_name)
    }
}

fn validate_names(last_name: &str, first_mid_name: &str) -> Result<(), AppError> {
    let mut errors = Vec::new();
    require_text(&mut errors, "lastName", last_name, 1, 50);
    require_text(&mut errors, "firstMidName", first_mid_name, 1, 50);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}
