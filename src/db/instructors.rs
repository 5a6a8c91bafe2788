use std::collections::HashMap;

use sqlx::{SqlitePool, SqliteConnection};
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{
    CourseAssignment, CourseAssignmentRow, Instructor, InstructorRow, NewInstructorRequest,
    UpdateInstructorRequest,
};
use crate::pagination::{Page, PageParams};

const SELECT_INSTRUCTOR: &str = "\
    SELECT i.id, i.last_name, i.first_mid_name, i.hire_date, o.location AS office_location \
    FROM instructors i \
    LEFT JOIN office_assignments o ON o.instructor_id = i.id";

pub async fn fetch_instructors(
    db: &SqlitePool,
    params: &PageParams,
    search: Option<&str>,
) -> Result<Page<Instructor>, AppError> {
    let mut where_sql = String::new();
    if search.is_some() {
        where_sql.push_str(" WHERE (instr(i.last_name, ?) > 0 OR instr(i.first_mid_name, ?) > 0)");
    }

    let count_sql = format!("SELECT COUNT(*) FROM instructors i{where_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(search) = search {
        count_query = count_query.bind(search).bind(search);
    }
    let total_count = count_query.fetch_one(db).await?;

    let list_sql = format!(
        "{SELECT_INSTRUCTOR}{where_sql} ORDER BY i.last_name, i.first_mid_name LIMIT ? OFFSET ?"
    );
    let mut list_query = sqlx::query_as::<_, InstructorRow>(&list_sql);
    if let Some(search) = search {
        list_query = list_query.bind(search).bind(search);
    }
    let rows = list_query
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut assignments = fetch_assignments(db, &ids).await?;

    let instructors = rows
        .into_iter()
        .map(|row| {
            let course_assignments = assignments.remove(&row.id).unwrap_or_default();
            row.into_dto(course_assignments)
        })
        .collect();

    Ok(Page::new(instructors, params, total_count))
}

pub async fn find_instructor_by_id(
    db: &SqlitePool,
    id: i64,
) -> Result<Option<Instructor>, AppError> {
    let sql = format!("{SELECT_INSTRUCTOR} WHERE i.id = ?");
    let row = sqlx::query_as::<_, InstructorRow>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    let Some(row) = row else {
        return Ok(None);
    };

    let mut assignments = fetch_assignments(db, &[row.id]).await?;
    let course_assignments = assignments.remove(&row.id).unwrap_or_default();
    Ok(Some(row.into_dto(course_assignments)))
}

pub async fn insert_instructor(
    db: &SqlitePool,
    req: NewInstructorRequest,
) -> Result<Instructor, AppError> {
    let mut tx = db.begin().await?;

    let result = sqlx::query(
        "INSERT INTO instructors (last_name, first_mid_name, hire_date) VALUES (?, ?, ?)",
    )
    .bind(&req.last_name)
    .bind(&req.first_mid_name)
    .bind(req.hire_date)
    .execute(&mut *tx)
    .await?;
    let id = result.last_insert_rowid();

    if let Some(location) = normalized_office(req.office_location.as_deref()) {
        sqlx::query("INSERT INTO office_assignments (instructor_id, location) VALUES (?, ?)")
            .bind(id)
            .bind(location)
            .execute(&mut *tx)
            .await?;
    }

    replace_course_assignments(&mut tx, id, &req.course_ids).await?;
    tx.commit().await?;

    info!("Created instructor {}: {}, {}", id, req.last_name, req.first_mid_name);

    let instructor = find_instructor_by_id(db, id).await?.ok_or(sqlx::Error::RowNotFound)?;
    Ok(instructor)
}

/// Full replacement: scalar fields, office assignment (set, change, or
/// clear), and the teaching-assignment set, all in one transaction.
pub async fn update_instructor(
    db: &SqlitePool,
    id: i64,
    req: UpdateInstructorRequest,
) -> Result<Instructor, AppError> {
    let mut tx = db.begin().await?;

    let result = sqlx::query(
        "UPDATE instructors SET last_name = ?, first_mid_name = ?, hire_date = ? WHERE id = ?",
    )
    .bind(&req.last_name)
    .bind(&req.first_mid_name)
    .bind(req.hire_date)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Instructor with ID {id} not found")));
    }

    match normalized_office(req.office_location.as_deref()) {
        Some(location) => {
            sqlx::query(
                "INSERT INTO office_assignments (instructor_id, location) VALUES (?, ?) \
                 ON CONFLICT(instructor_id) DO UPDATE SET location = excluded.location",
            )
            .bind(id)
            .bind(location)
            .execute(&mut *tx)
            .await?;
        }
        None => {
            sqlx::query("DELETE FROM office_assignments WHERE instructor_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
    }

    replace_course_assignments(&mut tx, id, &req.course_ids).await?;
    tx.commit().await?;

    info!("Updated instructor {}", id);

    let instructor = find_instructor_by_id(db, id).await?.ok_or(sqlx::Error::RowNotFound)?;
    Ok(instructor)
}

/// Guarded by the administrator reference; the office assignment and
/// teaching links cascade inside the same transaction.
pub async fn delete_instructor(db: &SqlitePool, id: i64) -> Result<(), AppError> {
    let mut tx = db.begin().await?;

    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM instructors WHERE id = ?)")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    if !exists {
        return Err(AppError::NotFound(format!("Instructor with ID {id} not found")));
    }

    let is_administrator =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM departments WHERE instructor_id = ?)")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
    if is_administrator {
        warn!("Blocked delete of instructor {}: department administrator", id);
        return Err(AppError::BadRequest(
            "Cannot delete instructor. This instructor is a department administrator.".to_string(),
        ));
    }

    sqlx::query("DELETE FROM instructors WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!("Deleted instructor {}", id);
    Ok(())
}

/// Batched secondary fetch for the course assignments of a set of
/// instructors, grouped by instructor id.
async fn fetch_assignments(
    db: &SqlitePool,
    instructor_ids: &[i64],
) -> Result<HashMap<i64, Vec<CourseAssignment>>, AppError> {
    if instructor_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders = vec!["?"; instructor_ids.len()].join(", ");
    let sql = format!(
        "SELECT ci.instructor_id, c.id AS course_id, c.course_number, \
                c.title AS course_title, d.name AS department_name \
         FROM course_instructors ci \
         JOIN courses c ON c.id = ci.course_id \
         JOIN departments d ON d.id = c.department_id \
         WHERE ci.instructor_id IN ({placeholders}) \
         ORDER BY c.course_number"
    );

    let mut query = sqlx::query_as::<_, CourseAssignmentRow>(&sql);
    for &id in instructor_ids {
        query = query.bind(id);
    }
    let rows = query.fetch_all(db).await?;

    let mut grouped: HashMap<i64, Vec<CourseAssignment>> = HashMap::new();
    for row in rows {
        grouped.entry(row.instructor_id).or_default().push(row.into_dto());
    }
    Ok(grouped)
}

/// Replaces the instructor's teaching set; ids that match no course are
/// ignored, as are duplicates in the request.
async fn replace_course_assignments(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    instructor_id: i64,
    course_ids: &[i64],
) -> Result<(), AppError> {
    let conn: &mut SqliteConnection = &mut *tx;
    sqlx::query("DELETE FROM course_instructors WHERE instructor_id = ?")
        .bind(instructor_id)
        .execute(&mut *conn)
        .await?;

    for &course_id in course_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO course_instructors (course_id, instructor_id) \
             SELECT id, ? FROM courses WHERE id = ?",
        )
        .bind(instructor_id)
        .bind(course_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

fn normalized_office(location: Option<&str>) -> Option<&str> {
    location.map(str::trim).filter(|s| !s.is_empty())
}
