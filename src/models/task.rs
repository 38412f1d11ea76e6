use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Category, UserSummary};

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

/// Input structure for creating a task. Every field is required.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    /// Maximum length of 1000 characters.
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: String,

    /// The category the task is filed under. Must reference an existing category.
    pub category_id: i32,

    /// Accepts an RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
    #[serde(with = "due_date")]
    pub due_date: DateTime<Utc>,

    pub priority: TaskPriority,

    pub is_completed: bool,

    /// How many minutes before `due_date` a reminder should fire.
    #[validate(range(min = 0, message = "Reminder must not be negative"))]
    pub reminder_minutes_before: i32,
}

/// Partial update of a task. Omitted (or `null`) fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub category_id: Option<i32>,

    #[serde(default, with = "due_date::option")]
    pub due_date: Option<DateTime<Utc>>,

    pub priority: Option<TaskPriority>,

    pub is_completed: Option<bool>,

    #[validate(range(min = 0, message = "Reminder must not be negative"))]
    pub reminder_minutes_before: Option<i32>,
}

/// Represents a task as returned by the API, with its category and owner resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: i32,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: TaskPriority,
    pub is_completed: bool,
    pub reminder_minutes_before: i32,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_at: DateTime<Utc>,
    /// Identifier of the owning user. Never changes after creation.
    pub user_id: i32,
    pub category: Category,
    pub user: UserSummary,
}

impl TaskPatch {
    /// Overwrites the fields of `task` that this patch supplies.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(is_completed) = self.is_completed {
            task.is_completed = is_completed;
        }
        if let Some(minutes) = self.reminder_minutes_before {
            task.reminder_minutes_before = minutes;
        }
    }
}

/// Serde adapter for due dates.
mod due_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        let raw = raw.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Ok(parsed.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
            return Ok(Utc.from_utc_datetime(&naive));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
            .ok_or_else(|| format!("invalid due_date {:?}: expected YYYY-MM-DD or RFC 3339", raw))
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::parse(&raw))
                .transpose()
                .map_err(de::Error::custom)
        }
    }
}
