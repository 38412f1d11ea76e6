//! Persistence for users, categories and tasks.
//!
//! Handlers and the auth flow talk to a `dyn Store`. `PgStore` is the
//! production implementation; `MemoryStore` keeps everything in process and
//! backs the test-suite.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskPatch, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Every task method is scoped by `owner_id`: a task owned by someone else is
/// indistinguishable from a task that does not exist.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round-trip used by the health check.
    async fn ping(&self) -> Result<(), AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Inserts a user. Fails with `AppError::Conflict` if the email is taken.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError>;

    /// Inserts a task owned by `owner_id` and returns it with category and
    /// owner resolved. An unknown category is an `AppError::InternalError`.
    async fn create_task(&self, owner_id: i32, input: TaskInput) -> Result<Task, AppError>;

    async fn list_tasks(&self, owner_id: i32) -> Result<Vec<Task>, AppError>;

    async fn find_task(&self, owner_id: i32, task_id: i32) -> Result<Option<Task>, AppError>;

    /// Applies `patch` atomically iff the task exists and belongs to `owner_id`.
    /// Returns `None` otherwise.
    async fn update_task(
        &self,
        owner_id: i32,
        task_id: i32,
        patch: TaskPatch,
    ) -> Result<Option<Task>, AppError>;

    /// Deletes the task iff it belongs to `owner_id`. Returns whether a row was removed.
    async fn delete_task(&self, owner_id: i32, task_id: i32) -> Result<bool, AppError>;
}
