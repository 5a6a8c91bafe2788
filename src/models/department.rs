use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{AppError, FieldError};
use crate::models::require_text;

/// `version` is the optimistic-concurrency token; clients must echo the
/// value they last read when updating.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub budget: f64,
    pub start_date: NaiveDate,
    pub instructor_id: Option<i64>,
    pub administrator_name: Option<String>,
    pub course_count: i64,
    pub version: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDepartmentRequest {
    pub name: String,
    pub budget: f64,
    pub start_date: NaiveDate,
    pub instructor_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartmentRequest {
    pub name: String,
    pub budget: f64,
    pub start_date: NaiveDate,
    pub instructor_id: Option<i64>,
    pub version: i64,
}

impl NewDepartmentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_fields(&self.name, self.budget)
    }
}

impl UpdateDepartmentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_fields(&self.name, self.budget)
    }
}

fn validate_fields(name: &str, budget: f64) -> Result<(), AppError> {
    let mut errors = Vec::new();
    require_text(&mut errors, "name", name, 3, 50);
    if !budget.is_finite() || budget < 0.0 {
        errors.push(FieldError::new("budget", "Budget must be a positive number"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}
