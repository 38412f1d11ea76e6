use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::Store;
use crate::error::AppError;
use crate::models::category::DEFAULT_CATEGORIES;
use crate::models::{Category, Task, TaskInput, TaskPatch, User, UserSummary};

/// In-process store with the same ownership semantics as `PgStore`.
///
/// Every operation takes the lock once, so each call is atomic like the
/// single-statement queries of the PostgreSQL store.
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    users: Vec<User>,
    categories: Vec<Category>,
    tasks: Vec<Task>,
    next_user_id: i32,
    next_task_id: i32,
}

impl MemoryStore {
    /// An empty store seeded with the default categories.
    pub fn new() -> Self {
        let categories = DEFAULT_CATEGORIES
            .iter()
            .zip(1..)
            .map(|(name, id)| Category {
                id,
                name: name.to_string(),
            })
            .collect();

        Self {
            state: Mutex::new(State {
                categories,
                next_user_id: 1,
                next_task_id: 1,
                ..State::default()
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, AppError> {
        self.state
            .lock()
            .map_err(|_| AppError::internal("memory store lock poisoned"))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    fn category(&self, id: i32) -> Result<Category, AppError> {
        self.categories
            .iter()
            .find(|category| category.id == id)
            .cloned()
            .ok_or_else(|| AppError::internal(format!("category {} does not exist", id)))
    }

    fn owned_task_index(&self, owner_id: i32, task_id: i32) -> Option<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == task_id && task.user_id == owner_id)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.lock().map(|_| ())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let state = self.lock()?;
        Ok(state.users.iter().find(|user| user.email == email).cloned())
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let mut state = self.lock()?;
        if state.users.iter().any(|user| user.email == email) {
            return Err(AppError::Conflict("User already exists".into()));
        }

        let user = User {
            id: state.next_user_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        state.next_user_id += 1;
        state.users.push(user.clone());
        Ok(user)
    }

    async fn create_task(&self, owner_id: i32, input: TaskInput) -> Result<Task, AppError> {
        let mut state = self.lock()?;
        let category = state.category(input.category_id)?;
        let owner = state
            .users
            .iter()
            .find(|user| user.id == owner_id)
            .map(UserSummary::from)
            .ok_or_else(|| AppError::internal(format!("user {} does not exist", owner_id)))?;

        let now = Utc::now();
        let task = Task {
            id: state.next_task_id,
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            priority: input.priority,
            is_completed: input.is_completed,
            reminder_minutes_before: input.reminder_minutes_before,
            created_at: now,
            updated_at: now,
            user_id: owner_id,
            category,
            user: owner,
        };
        state.next_task_id += 1;
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn list_tasks(&self, owner_id: i32) -> Result<Vec<Task>, AppError> {
        let state = self.lock()?;
        Ok(state
            .tasks
            .iter()
            .filter(|task| task.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_task(&self, owner_id: i32, task_id: i32) -> Result<Option<Task>, AppError> {
        let state = self.lock()?;
        Ok(state
            .tasks
            .iter()
            .find(|task| task.id == task_id && task.user_id == owner_id)
            .cloned())
    }

    async fn update_task(
        &self,
        owner_id: i32,
        task_id: i32,
        patch: TaskPatch,
    ) -> Result<Option<Task>, AppError> {
        let mut state = self.lock()?;
        // Ownership first: a foreign or missing task is None even with a bad category.
        let Some(index) = state.owned_task_index(owner_id, task_id) else {
            return Ok(None);
        };
        let category = match patch.category_id {
            Some(id) => Some(state.category(id)?),
            None => None,
        };

        let task = &mut state.tasks[index];
        patch.apply_to(task);
        if let Some(category) = category {
            task.category = category;
        }
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, owner_id: i32, task_id: i32) -> Result<bool, AppError> {
        let mut state = self.lock()?;
        let before = state.tasks.len();
        state
            .tasks
            .retain(|task| !(task.id == task_id && task.user_id == owner_id));
        Ok(state.tasks.len() < before)
    }
}
