use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::task::errors::TaskError;
use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::TaskTitle;
use crate::domain::task::models::UpdateTaskCommand;
use crate::domain::task::ports::TaskRepository;
use crate::domain::user::models::UserId;

/// PostgreSQL task store.
///
/// Every statement carries `owner_id` in its WHERE clause; there is no query
/// in this file that can touch another owner's rows.
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_task(row: &PgRow) -> Result<Task, TaskError> {
        let id: i64 = row.try_get("id").map_err(database_error)?;
        let title: String = row.try_get("title").map_err(database_error)?;

        Ok(Task {
            id: TaskId::new(id)
                .map_err(|e| TaskError::DatabaseError(format!("Stored task id invalid: {}", e)))?,
            owner_id: UserId(row.try_get("owner_id").map_err(database_error)?),
            title: TaskTitle::new(title)
                .map_err(|e| TaskError::DatabaseError(format!("Stored title invalid: {}", e)))?,
            description: row.try_get("description").map_err(database_error)?,
            completed: row.try_get("completed").map_err(database_error)?,
        })
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(
        &self,
        owner_id: UserId,
        command: CreateTaskCommand,
    ) -> Result<Task, TaskError> {
        let row = sqlx::query(
            r#"
            INSERT INTO tasks (owner_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, owner_id, title, description, completed
            "#,
        )
        .bind(owner_id.as_i64())
        .bind(command.title.as_str())
        .bind(&command.description)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        Self::row_to_task(&row)
    }

    async fn update(
        &self,
        owner_id: UserId,
        id: TaskId,
        command: UpdateTaskCommand,
    ) -> Result<(), TaskError> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = $3, description = $4, completed = $5
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id.as_i64())
        .bind(owner_id.as_i64())
        .bind(command.title.as_str())
        .bind(&command.description)
        .bind(command.completed)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(TaskError::TaskNotFound);
        }

        Ok(())
    }

    async fn delete(&self, owner_id: UserId, id: TaskId) -> Result<(), TaskError> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id.as_i64())
        .bind(owner_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(TaskError::TaskNotFound);
        }

        Ok(())
    }

    async fn find_by_id(&self, owner_id: UserId, id: TaskId) -> Result<Option<Task>, TaskError> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, title, description, completed
            FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id.as_i64())
        .bind(owner_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(Self::row_to_task).transpose()
    }

    async fn find_all(&self, owner_id: UserId) -> Result<Vec<Task>, TaskError> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, title, description, completed
            FROM tasks
            WHERE owner_id = $1
            ORDER BY id
            "#,
        )
        .bind(owner_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.iter().map(Self::row_to_task).collect()
    }
}

fn database_error(e: sqlx::Error) -> TaskError {
    TaskError::DatabaseError(e.to_string())
}
