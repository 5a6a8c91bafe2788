pub mod course;
pub mod department;
pub mod enrollment;
pub mod instructor;
pub mod student;

pub use course::{Course, NewCourseRequest, UpdateCourseRequest};
pub use department::{Department, NewDepartmentRequest, UpdateDepartmentRequest};
pub use enrollment::{
    Enrollment, EnrollmentRow, Grade, NewEnrollmentRequest, UpdateEnrollmentRequest,
};
pub use instructor::{
    CourseAssignment, CourseAssignmentRow, Instructor, InstructorRow, NewInstructorRequest,
    UpdateInstructorRequest,
};
pub use student::{NewStudentRequest, Student, UpdateStudentRequest};

use crate::error::FieldError;

pub(crate) fn require_text(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.trim().chars().count();
    if len < min || len > max {
        errors.push(FieldError::new(
            field,
            format!("{field} must be between {min} and {max} characters"),
        ));
    }
}

pub(crate) fn require_positive(errors: &mut Vec<FieldError>, field: &'static str, value: i64) {
    if value < 1 {
        errors.push(FieldError::new(
            field,
            format!("{field} must be a positive number"),
        ));
    }
}
