use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{Course, NewCourseRequest, UpdateCourseRequest};
use crate::pagination::{Page, PageParams};

const SELECT_COURSE: &str = "\
    SELECT c.id, c.course_number, c.title, c.credits, c.department_id, c.version, \
           d.name AS department_name, \
           (SELECT COUNT(*) FROM enrollments e WHERE e.course_id = c.id) AS enrollment_count \
    FROM courses c \
    JOIN departments d ON d.id = c.department_id";

pub async fn fetch_courses(
    db: &SqlitePool,
    params: &PageParams,
    department_id: Option<i64>,
    search: Option<&str>,
) -> Result<Page<Course>, AppError> {
    let mut conditions = Vec::new();
    if department_id.is_some() {
        conditions.push("c.department_id = ?");
    }
    if search.is_some() {
        conditions.push("instr(c.title, ?) > 0");
    }
    let where_sql = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM courses c{where_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(department_id) = department_id {
        count_query = count_query.bind(department_id);
    }
    if let Some(search) = search {
        count_query = count_query.bind(search);
    }
    let total_count = count_query.fetch_one(db).await?;

    let list_sql = format!("{SELECT_COURSE}{where_sql} ORDER BY c.id LIMIT ? OFFSET ?");
    let mut list_query = sqlx::query_as::<_, Course>(&list_sql);
    if let Some(department_id) = department_id {
        list_query = list_query.bind(department_id);
    }
    if let Some(search) = search {
        list_query = list_query.bind(search);
    }
    let courses = list_query
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

    Ok(Page::new(courses, params, total_count))
}

pub async fn find_course_by_id(db: &SqlitePool, id: i64) -> Result<Option<Course>, AppError> {
    let sql = format!("{SELECT_COURSE} WHERE c.id = ?");
    let course = sqlx::query_as::<_, Course>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(course)
}

pub async fn insert_course(db: &SqlitePool, req: NewCourseRequest) -> Result<Course, AppError> {
    let department_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM departments WHERE id = ?)")
            .bind(req.department_id)
            .fetch_one(db)
            .await?;
    if !department_exists {
        return Err(AppError::NotFound(format!(
            "Department with ID {} not found",
            req.department_id
        )));
    }

    // The UNIQUE constraint on course_number is the authoritative check; a
    // racing insert surfaces as a unique violation below.
    let result = sqlx::query(
        "INSERT INTO courses (course_number, title, credits, department_id) VALUES (?, ?, ?, ?)",
    )
    .bind(req.course_number)
    .bind(&req.title)
    .bind(req.credits)
    .bind(req.department_id)
    .execute(db)
    .await;

    let result = match result {
        Ok(result) => result,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            warn!("Duplicate course number {}", req.course_number);
            return Err(AppError::BadRequest(format!(
                "Course number {} already exists",
                req.course_number
            )));
        }
        Err(e) => return Err(e.into()),
    };
    let id = result.last_insert_rowid();

    info!("Created course {}: {}", id, req.title);

    let course = find_course_by_id(db, id).await?.ok_or(sqlx::Error::RowNotFound)?;
    Ok(course)
}

/// Compare-and-set on the version column; exactly one of two racing updates
/// with the same original token can succeed.
pub async fn update_course(
    db: &SqlitePool,
    id: i64,
    req: UpdateCourseRequest,
) -> Result<Course, AppError> {
    let department_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM departments WHERE id = ?)")
            .bind(req.department_id)
            .fetch_one(db)
            .await?;
    if !department_exists {
        return Err(AppError::NotFound(format!(
            "Department with ID {} not found",
            req.department_id
        )));
    }

    let result = sqlx::query(
        "UPDATE courses SET title = ?, credits = ?, department_id = ?, version = version + 1 \
         WHERE id = ? AND version = ?",
    )
    .bind(&req.title)
    .bind(req.credits)
    .bind(req.department_id)
    .bind(id)
    .bind(req.version)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return match find_course_by_id(db, id).await? {
            None => Err(AppError::NotFound(format!(
                "Course with ID {id} was deleted by another user"
            ))),
            Some(_) => {
                warn!("Concurrency conflict updating course {}", id);
                Err(AppError::Conflict(
                    "The course was modified by another user. Please refresh and try again."
                        .to_string(),
                ))
            }
        };
    }

    info!("Updated course {}: {}", id, req.title);

    let course = find_course_by_id(db, id).await?.ok_or(sqlx::Error::RowNotFound)?;
    Ok(course)
}

/// Guard and delete run in one transaction so an enrollment created after
/// the check cannot be orphaned.
pub async fn delete_course(db: &SqlitePool, id: i64) -> Result<(), AppError> {
    let mut tx = db.begin().await?;

    let title = sqlx::query_scalar::<_, String>("SELECT title FROM courses WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(title) = title else {
        return Err(AppError::NotFound(format!("Course with ID {id} not found")));
    };

    let enrollment_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM enrollments WHERE course_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
    if enrollment_count > 0 {
        warn!("Blocked delete of course {}: {} enrollment(s)", id, enrollment_count);
        return Err(AppError::BadRequest(format!(
            "Cannot delete course {title} because it has {enrollment_count} enrollment(s). \
             Remove enrollments first."
        )));
    }

    sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!("Deleted course {}: {}", id, title);
    Ok(())
}
