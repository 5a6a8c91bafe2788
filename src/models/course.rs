use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{AppError, FieldError};
use crate::models::{require_positive, require_text};

/// The course number is the user-facing business key, distinct from the
/// server-assigned id. It is fixed at creation.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub course_number: i64,
    pub title: String,
    pub credits: i64,
    pub department_id: i64,
    pub department_name: String,
    pub enrollment_count: i64,
    pub version: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourseRequest {
    pub course_number: i64,
    pub title: String,
    pub credits: i64,
    pub department_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub title: String,
    pub credits: i64,
    pub department_id: i64,
    pub version: i64,
}

impl NewCourseRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();
        require_positive(&mut errors, "courseNumber", self.course_number);
        validate_fields(&mut errors, &self.title, self.credits, self.department_id);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

impl UpdateCourseRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();
        validate_fields(&mut errors, &self.title, self.credits, self.department_id);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

fn validate_fields(errors: &mut Vec<FieldError>, title: &str, credits: i64, department_id: i64) {
    require_text(errors, "title", title, 3, 50);
    if !(0..=5).contains(&credits) {
        errors.push(FieldError::new("credits", "Credits must be between 0 and 5"));
    }
    require_positive(errors, "departmentId", department_id);
}
