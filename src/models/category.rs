use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Reference data a task is filed under. Seeded by the initial migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

/// Categories every fresh store starts with, in id order.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["Work", "Personal", "Shopping", "Health", "Other"];
