use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{Department, NewDepartmentRequest, UpdateDepartmentRequest};
use crate::pagination::{Page, PageParams};

const SELECT_DEPARTMENT: &str = "\
    SELECT d.id, d.name, d.budget, d.start_date, d.instructor_id, d.version, \
           i.first_mid_name || ' ' || i.last_name AS administrator_name, \
           (SELECT COUNT(*) FROM courses c WHERE c.department_id = d.id) AS course_count \
    FROM departments d \
    LEFT JOIN instructors i ON i.id = d.instructor_id";

pub async fn fetch_departments(
    db: &SqlitePool,
    params: &PageParams,
    search: Option<&str>,
) -> Result<Page<Department>, AppError> {
    let mut where_sql = String::new();
    if search.is_some() {
        where_sql.push_str(" WHERE instr(d.name, ?) > 0");
    }

    let count_sql = format!("SELECT COUNT(*) FROM departments d{where_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(search) = search {
        count_query = count_query.bind(search);
    }
    let total_count = count_query.fetch_one(db).await?;

    let list_sql = format!("{SELECT_DEPARTMENT}{where_sql} ORDER BY d.name LIMIT ? OFFSET ?");
    let mut list_query = sqlx::query_as::<_, Department>(&list_sql);
    if let Some(search) = search {
        list_query = list_query.bind(search);
    }
    let departments = list_query
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

    Ok(Page::new(departments, params, total_count))
}

pub async fn find_department_by_id(
    db: &SqlitePool,
    id: i64,
) -> Result<Option<Department>, AppError> {
    let sql = format!("{SELECT_DEPARTMENT} WHERE d.id = ?");
    let department = sqlx::query_as::<_, Department>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(department)
}

pub async fn insert_department(
    db: &SqlitePool,
    req: NewDepartmentRequest,
) -> Result<Department, AppError> {
    ensure_administrator_exists(db, req.instructor_id).await?;

    let result = sqlx::query(
        "INSERT INTO departments (name, budget, start_date, instructor_id) VALUES (?, ?, ?, ?)",
    )
    .bind(&req.name)
    .bind(req.budget)
    .bind(req.start_date)
    .bind(req.instructor_id)
    .execute(db)
    .await?;
    let id = result.last_insert_rowid();

    info!("Created department {}: {}", id, req.name);

    let department = find_department_by_id(db, id).await?.ok_or(sqlx::Error::RowNotFound)?;
    Ok(department)
}

/// Compare-and-set on the version column, same contract as course updates:
/// zero rows affected means either the row is gone (404) or the caller's
/// token is stale (409).
pub async fn update_department(
    db: &SqlitePool,
    id: i64,
    req: UpdateDepartmentRequest,
) -> Result<Department, AppError> {
    ensure_administrator_exists(db, req.instructor_id).await?;

    let result = sqlx::query(
        "UPDATE departments SET name = ?, budget = ?, start_date = ?, instructor_id = ?, \
         version = version + 1 \
         WHERE id = ? AND version = ?",
    )
    .bind(&req.name)
    .bind(req.budget)
    .bind(req.start_date)
    .bind(req.instructor_id)
    .bind(id)
    .bind(req.version)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return match find_department_by_id(db, id).await? {
            None => Err(AppError::NotFound(format!(
                "Department with ID {id} was deleted by another user"
            ))),
            Some(_) => {
                warn!("Concurrency conflict updating department {}", id);
                Err(AppError::Conflict(
                    "The department was modified by another user. Please refresh and try again."
                        .to_string(),
                ))
            }
        };
    }

    info!("Updated department {}: {}", id, req.name);

    let department = find_department_by_id(db, id).await?.ok_or(sqlx::Error::RowNotFound)?;
    Ok(department)
}

/// Guard and delete run in one transaction; a course created after the
/// count cannot slip past the delete.
pub async fn delete_department(db: &SqlitePool, id: i64) -> Result<(), AppError> {
    let mut tx = db.begin().await?;

    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM departments WHERE id = ?)")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    if !exists {
        return Err(AppError::NotFound(format!("Department with ID {id} not found")));
    }

    let course_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses WHERE department_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
    if course_count > 0 {
        warn!("Blocked delete of department {}: {} course(s)", id, course_count);
        return Err(AppError::BadRequest(format!(
            "Cannot delete department. It has {course_count} course(s) assigned."
        )));
    }

    sqlx::query("DELETE FROM departments WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!("Deleted department {}", id);
    Ok(())
}

async fn ensure_administrator_exists(
    db: &SqlitePool,
    instructor_id: Option<i64>,
) -> Result<(), AppError> {
    let Some(instructor_id) = instructor_id else {
        return Ok(());
    };
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM instructors WHERE id = ?)")
        .bind(instructor_id)
        .fetch_one(db)
        .await?;
    if exists {
        Ok(())
    } else {
        Err(AppError::NotFound(format!(
            "Instructor with ID {instructor_id} does not exist"
        )))
    }
}
