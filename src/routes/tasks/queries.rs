use chrono::Utc;
use sqlx::SqlitePool;

use super::dto::NewTask;
use super::model::TaskRow;
use crate::error::ApiError;

const TASK_COLUMNS: &str =
    "id, title, description, priority, completed, created_at, completed_at";

/// Storage client for the `tasks` table. Built from an explicit pool so
/// handlers and tests can share or isolate databases as they need.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    pool: SqlitePool,
}

impl TaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trips a trivial query to check the database answers.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// All tasks, HIGH before MEDIUM before LOW, then by title.
    pub async fn list(&self) -> Result<Vec<TaskRow>, ApiError> {
        let sql = format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            ORDER BY
                CASE priority
                    WHEN 'HIGH' THEN 1
                    WHEN 'MEDIUM' THEN 2
                    WHEN 'LOW' THEN 3
                END,
                title
            "#
        );

        sqlx::query_as::<_, TaskRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(ApiError::storage("Failed to fetch tasks"))
    }

    pub async fn get(&self, id: i64) -> Result<TaskRow, ApiError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?");

        sqlx::query_as::<_, TaskRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(ApiError::storage("Failed to fetch task"))?
            .ok_or_else(ApiError::task_not_found)
    }

    pub async fn create(&self, task: &NewTask) -> Result<TaskRow, ApiError> {
        let result = sqlx::query(
            r#"
            INSERT INTO tasks (title, description, priority, completed, created_at, completed_at)
            VALUES (?, ?, ?, 0, ?, NULL)
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(ApiError::storage("Failed to create task"))?;

        self.get(result.last_insert_rowid()).await
    }

    /// Sets the completion flag. `completed_at` is stamped when completing
    /// and cleared when reopening.
    pub async fn set_completed(&self, id: i64, completed: bool) -> Result<TaskRow, ApiError> {
        let completed_at = completed.then(Utc::now);
        let sql = format!(
            r#"
            UPDATE tasks
            SET completed = ?, completed_at = ?
            WHERE id = ?
            RETURNING {TASK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, TaskRow>(&sql)
            .bind(completed)
            .bind(completed_at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(ApiError::storage("Failed to update task"))?
            .ok_or_else(ApiError::task_not_found)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(ApiError::storage("Failed to delete task"))?;

        if result.rows_affected() == 0 {
            return Err(ApiError::task_not_found());
        }

        Ok(())
    }
}
