use sqlx::SqlitePool;
use tracing::info;

use crate::error::AppError;
use crate::models::{NewStudentRequest, Student, UpdateStudentRequest};
use crate::pagination::{Page, PageParams};

const SELECT_STUDENT: &str = "\
    SELECT s.id, s.last_name, s.first_mid_name, s.enrollment_date, \
           (SELECT COUNT(*) FROM enrollments e WHERE e.student_id = s.id) AS enrollment_count \
    FROM students s";

pub async fn fetch_students(
    db: &SqlitePool,
    params: &PageParams,
    search: Option<&str>,
) -> Result<Page<Student>, AppError> {
    let mut where_sql = String::new();
    if search.is_some() {
        where_sql.push_str(" WHERE (instr(s.last_name, ?) > 0 OR instr(s.first_mid_name, ?) > 0)");
    }

    let count_sql = format!("SELECT COUNT(*) FROM students s{where_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(search) = search {
        count_query = count_query.bind(search).bind(search);
    }
    let total_count = count_query.fetch_one(db).await?;

    let list_sql = format!(
        "{SELECT_STUDENT}{where_sql} ORDER BY s.last_name, s.first_mid_name LIMIT ? OFFSET ?"
    );
    let mut list_query = sqlx::query_as::<_, Student>(&list_sql);
    if let Some(search) = search {
        list_query = list_query.bind(search).bind(search);
    }
    let students = list_query
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

    Ok(Page::new(students, params, total_count))
}

pub async fn find_student_by_id(db: &SqlitePool, id: i64) -> Result<Option<Student>, AppError> {
    let sql = format!("{SELECT_STUDENT} WHERE s.id = ?");
    let student = sqlx::query_as::<_, Student>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(student)
}

pub async fn insert_student(
    db: &SqlitePool,
    req: NewStudentRequest,
) -> Result<Student, AppError> {
    let result =
        sqlx::query("INSERT INTO students (last_name, first_mid_name, enrollment_date) VALUES (?, ?, ?)")
            .bind(&req.last_name)
            .bind(&req.first_mid_name)
            .bind(req.enrollment_date)
            .execute(db)
            .await?;
    let id = result.last_insert_rowid();

    info!("Created student {}: {}, {}", id, req.last_name, req.first_mid_name);

    let student = find_student_by_id(db, id).await?.ok_or(sqlx::Error::RowNotFound)?;
    Ok(student)
}

pub async fn update_student(
    db: &SqlitePool,
    id: i64,
    req: UpdateStudentRequest,
) -> Result<Student, AppError> {
    let result = sqlx::query(
        "UPDATE students SET last_name = ?, first_mid_name = ?, enrollment_date = ? WHERE id = ?",
    )
    .bind(&req.last_name)
    .bind(&req.first_mid_name)
    .bind(req.enrollment_date)
    .bind(id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Student with ID {id} not found")));
    }

    info!("Updated student {}", id);

    let student = find_student_by_id(db, id).await?.ok_or(sqlx::Error::RowNotFound)?;
    Ok(student)
}

/// The student's enrollments go with them (cascade); student deletes are
/// not guarded.
pub async fn delete_student(db: &SqlitePool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM students WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Student with ID {id} not found")));
    }

    info!("Deleted student {}", id);
    Ok(())
}
