use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{Enrollment, EnrollmentRow, NewEnrollmentRequest, UpdateEnrollmentRequest};
use crate::pagination::{Page, PageParams};

const SELECT_ENROLLMENT: &str = "\
    SELECT e.id, e.student_id, e.course_id, e.grade, \
           s.first_mid_name || ' ' || s.last_name AS student_name, \
           c.title AS course_title \
    FROM enrollments e \
    JOIN students s ON s.id = e.student_id \
    JOIN courses c ON c.id = e.course_id";

pub async fn fetch_enrollments(
    db: &SqlitePool,
    params: &PageParams,
    student_id: Option<i64>,
    course_id: Option<i64>,
) -> Result<Page<Enrollment>, AppError> {
    let mut conditions = Vec::new();
    if student_id.is_some() {
        conditions.push("e.student_id = ?");
    }
    if course_id.is_some() {
        conditions.push("e.course_id = ?");
    }
    let where_sql = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM enrollments e{where_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(student_id) = student_id {
        count_query = count_query.bind(student_id);
    }
    if let Some(course_id) = course_id {
        count_query = count_query.bind(course_id);
    }
    let total_count = count_query.fetch_one(db).await?;

    let list_sql = format!(
        "{SELECT_ENROLLMENT}{where_sql} \
         ORDER BY s.last_name, s.first_mid_name, c.title LIMIT ? OFFSET ?"
    );
    let mut list_query = sqlx::query_as::<_, EnrollmentRow>(&list_sql);
    if let Some(student_id) = student_id {
        list_query = list_query.bind(student_id);
    }
    if let Some(course_id) = course_id {
        list_query = list_query.bind(course_id);
    }
    let rows = list_query
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

    let page = Page::new(rows, params, total_count);
    Ok(page.map(EnrollmentRow::into_dto))
}

pub async fn find_enrollment_by_id(
    db: &SqlitePool,
    id: i64,
) -> Result<Option<Enrollment>, AppError> {
    let sql = format!("{SELECT_ENROLLMENT} WHERE e.id = ?");
    let row = sqlx::query_as::<_, EnrollmentRow>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row.map(EnrollmentRow::into_dto))
}

pub async fn insert_enrollment(
    db: &SqlitePool,
    req: NewEnrollmentRequest,
) -> Result<Enrollment, AppError> {
    let student_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM students WHERE id = ?)")
            .bind(req.student_id)
            .fetch_one(db)
            .await?;
    if !student_exists {
        return Err(AppError::NotFound(format!(
            "Student with ID {} does not exist",
            req.student_id
        )));
    }

    let course_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM courses WHERE id = ?)")
            .bind(req.course_id)
            .fetch_one(db)
            .await?;
    if !course_exists {
        return Err(AppError::NotFound(format!(
            "Course with ID {} does not exist",
            req.course_id
        )));
    }

    // The UNIQUE (student_id, course_id) constraint decides duplicates; no
    // read-then-insert window.
    let result = sqlx::query("INSERT INTO enrollments (student_id, course_id, grade) VALUES (?, ?, ?)")
        .bind(req.student_id)
        .bind(req.course_id)
        .bind(req.grade.map(|g| g.as_str()))
        .execute(db)
        .await;

    let result = match result {
        Ok(result) => result,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            warn!(
                "Duplicate enrollment for student {} in course {}",
                req.student_id, req.course_id
            );
            return Err(AppError::Conflict(
                "Student is already enrolled in this course".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };
    let id = result.last_insert_rowid();

    info!(
        "Created enrollment {} (student {}, course {})",
        id, req.student_id, req.course_id
    );

    let enrollment = find_enrollment_by_id(db, id).await?.ok_or(sqlx::Error::RowNotFound)?;
    Ok(enrollment)
}

pub async fn update_enrollment(
    db: &SqlitePool,
    id: i64,
    req: UpdateEnrollmentRequest,
) -> Result<Enrollment, AppError> {
    let result = sqlx::query("UPDATE enrollments SET grade = ? WHERE id = ?")
        .bind(req.grade.map(|g| g.as_str()))
        .bind(id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Enrollment with ID {id} not found")));
    }

    info!("Updated enrollment {}", id);

    let enrollment = find_enrollment_by_id(db, id).await?.ok_or(sqlx::Error::RowNotFound)?;
    Ok(enrollment)
}

pub async fn delete_enrollment(db: &SqlitePool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM enrollments WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Enrollment with ID {id} not found")));
    }

    info!("Deleted enrollment {}", id);
    Ok(())
}
