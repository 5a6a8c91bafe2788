use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use crate::models::require_positive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "A" => Some(Grade::A),
            "B" => Some(Grade::B),
            "C" => Some(Grade::C),
            "D" => Some(Grade::D),
            "F" => Some(Grade::F),
            _ => None,
        }
    }
}

/// Joined row shape; `student_name` and `course_title` come from the
/// enrollment list/detail JOIN.
#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentRow {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub grade: Option<String>,
    pub student_name: String,
    pub course_title: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub course_id: i64,
    pub course_title: String,
    pub grade: Option<Grade>,
}

impl EnrollmentRow {
    pub fn into_dto(self) -> Enrollment {
        Enrollment {
            id: self.id,
            student_id: self.student_id,
            student_name: self.student_name,
            course_id: self.course_id,
            course_title: self.course_title,
            grade: self.grade.as_deref().and_then(Grade::parse),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEnrollmentRequest {
    pub student_id: i64,
    pub course_id: i64,
    pub grade: Option<Grade>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnrollmentRequest {
    pub grade: Option<Grade>,
}

impl NewEnrollmentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();
        require_positive(&mut errors, "studentId", self.student_id);
        require_positive(&mut errors, "courseId", self.course_id);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}
