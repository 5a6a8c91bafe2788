use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use crate::models::require_text;

#[derive(Debug, Clone, FromRow)]
pub struct InstructorRow {
    pub id: i64,
    pub last_name: String,
    pub first_mid_name: String,
    pub hire_date: NaiveDate,
    pub office_location: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CourseAssignmentRow {
    pub instructor_id: i64,
    pub course_id: i64,
    pub course_number: i64,
    pub course_title: String,
    pub department_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAssignment {
    pub course_id: i64,
    pub course_number: i64,
    pub course_title: String,
    pub department_name: String,
}

impl CourseAssignmentRow {
    pub fn into_dto(self) -> CourseAssignment {
        CourseAssignment {
            course_id: self.course_id,
            course_number: self.course_number,
            course_title: self.course_title,
            department_name: self.department_name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    pub id: i64,
    pub last_name: String,
    pub first_mid_name: String,
    pub hire_date: NaiveDate,
    pub full_name: String,
    pub office_location: Option<String>,
    pub course_assignments: Vec<CourseAssignment>,
}

impl InstructorRow {
    pub fn into_dto(self, course_assignments: Vec<CourseAssignment>) -> Instructor {
        Instructor {
            full_name: format!("{}, {}", self.last_name, self.first_mid_name),
            id: self.id,
            last_name: self.last_name,
            first_mid_name: self.first_mid_name,
            hire_date: self.hire_date,
            office_location: self.office_location,
            course_assignments,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInstructorRequest {
    pub last_name: String,
    pub first_mid_name: String,
    pub hire_date: NaiveDate,
    pub office_location: Option<String>,
    #[serde(default)]
    pub course_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInstructorRequest {
    pub last_name: String,
    pub first_mid_name: String,
    pub hire_date: NaiveDate,
    pub office_location: Option<String>,
    #[serde(default)]
    pub course_ids: Vec<i64>,
}

impl NewInstructorRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_fields(
            &self.last_name,
            &self.first_mid_name,
            self.office_location.as_deref(),
        )
    }
}

impl UpdateInstructorRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_fields(
            &self.last_name,
            &self.first_mid_name,
            self.office_location.as_deref(),
        )
    }
}

fn validate_fields(
    last_name: &str,
    first_mid_name: &str,
    office_location: Option<&str>,
) -> Result<(), AppError> {
    let mut errors = Vec::new();
    require_text(&mut errors, "lastName", last_name, 1, 50);
    require_text(&mut errors, "firstMidName", first_mid_name, 1, 50);
    if let Some(location) = office_location {
        if !location.trim().is_empty() {
            require_text(&mut errors, "officeLocation", location, 1, 50);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}
