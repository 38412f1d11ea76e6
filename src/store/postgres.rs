use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::Store;
use crate::error::AppError;
use crate::models::{Category, Task, TaskInput, TaskPatch, TaskPriority, User, UserSummary};

/// Columns selected for every task query. Expects the task row aliased as `t`.
const TASK_COLUMNS: &str = "t.id, t.title, t.description, t.due_date, t.priority, t.is_completed, \
     t.reminder_minutes_before, t.created_at, t.updated_at, t.user_id, \
     u.email AS user_email, c.id AS category_id, c.name AS category_name";

const TASK_JOINS: &str = "JOIN categories c ON c.id = t.category_id JOIN users u ON u.id = t.user_id";

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flat shape of a task joined with its category and owner.
#[derive(Debug, FromRow)]
struct TaskRow {
    id: i32,
    title: String,
    description: String,
    due_date: DateTime<Utc>,
    priority: TaskPriority,
    is_completed: bool,
    reminder_minutes_before: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_id: i32,
    user_email: String,
    category_id: i32,
    category_name: String,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            title: row.title,
            description: row.description,
            due_date: row.due_date,
            priority: row.priority,
            is_completed: row.is_completed,
            reminder_minutes_before: row.reminder_minutes_before,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user_id: row.user_id,
            category: Category {
                id: row.category_id,
                name: row.category_name,
            },
            user: UserSummary {
                id: row.user_id,
                email: row.user_email,
            },
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2)
             RETURNING id, email, password_hash, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict("User already exists".into()),
            other => other,
        })
    }

    async fn create_task(&self, owner_id: i32, input: TaskInput) -> Result<Task, AppError> {
        let sql = format!(
            "WITH t AS (
                 INSERT INTO tasks (title, description, category_id, due_date, priority,
                                    is_completed, reminder_minutes_before, user_id)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 RETURNING *
             )
             SELECT {TASK_COLUMNS} FROM t {TASK_JOINS}"
        );

        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category_id)
            .bind(input.due_date)
            .bind(input.priority)
            .bind(input.is_completed)
            .bind(input.reminder_minutes_before)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn list_tasks(&self, owner_id: i32) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks t {TASK_JOINS} WHERE t.user_id = $1 ORDER BY t.id"
        );

        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn find_task(&self, owner_id: i32, task_id: i32) -> Result<Option<Task>, AppError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks t {TASK_JOINS} WHERE t.id = $1 AND t.user_id = $2"
        );

        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(task_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Task::from))
    }

    async fn update_task(
        &self,
        owner_id: i32,
        task_id: i32,
        patch: TaskPatch,
    ) -> Result<Option<Task>, AppError> {
        // Ownership check and mutation in one statement.
        let sql = format!(
            "WITH t AS (
                 UPDATE tasks SET
                     title = COALESCE($3, title),
                     description = COALESCE($4, description),
                     category_id = COALESCE($5, category_id),
                     due_date = COALESCE($6, due_date),
                     priority = COALESCE($7, priority),
                     is_completed = COALESCE($8, is_completed),
                     reminder_minutes_before = COALESCE($9, reminder_minutes_before),
                     updated_at = NOW()
                 WHERE id = $1 AND user_id = $2
                 RETURNING *
             )
             SELECT {TASK_COLUMNS} FROM t {TASK_JOINS}"
        );

        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(task_id)
            .bind(owner_id)
            .bind(patch.title)
            .bind(patch.description)
            .bind(patch.category_id)
            .bind(patch.due_date)
            .bind(patch.priority)
            .bind(patch.is_completed)
            .bind(patch.reminder_minutes_before)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Task::from))
    }

    async fn delete_task(&self, owner_id: i32, task_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
