use std::fmt;
use std::str::FromStr;

use crate::domain::task::errors::TaskIdError;
use crate::domain::task::errors::TaskTitleError;
use crate::domain::user::models::UserId;

/// Task aggregate entity.
///
/// Always belongs to exactly one user; `owner_id` is set from the
/// authenticated caller and never from request input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub owner_id: UserId,
    pub title: TaskTitle,
    pub description: String,
    pub completed: bool,
}

/// Task unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(i64);

impl TaskId {
    pub const MIN: TaskId = TaskId(1);
    pub const MAX: TaskId = TaskId(i64::MAX);

    /// Create a task ID from a raw integer.
    ///
    /// # Errors
    /// * `NotPositive` - Zero or negative id
    pub fn new(id: i64) -> Result<Self, TaskIdError> {
        if id > 0 {
            Ok(Self(id))
        } else {
            Err(TaskIdError::NotPositive(id))
        }
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl FromStr for TaskId {
    type Err = TaskIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .parse::<i64>()
            .map_err(|e| TaskIdError::InvalidFormat(e.to_string()))?;
        Self::new(id)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Task title value type
///
/// Non-blank, at most 255 characters, stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTitle(String);

impl TaskTitle {
    const MAX_LENGTH: usize = 255;

    /// Create a new valid title.
    ///
    /// # Errors
    /// * `Empty` - Title is empty or whitespace only
    /// * `TooLong` - Title longer than 255 characters after trimming
    pub fn new(title: String) -> Result<Self, TaskTitleError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(TaskTitleError::Empty);
        }

        let length = trimmed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(TaskTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to create a new task with validated fields
#[derive(Debug, Clone)]
pub struct CreateTaskCommand {
    pub title: TaskTitle,
    pub description: String,
}

impl CreateTaskCommand {
    pub fn new(title: TaskTitle, description: String) -> Self {
        Self { title, description }
    }
}

/// Command to replace every mutable field of a task.
#[derive(Debug, Clone)]
pub struct UpdateTaskCommand {
    pub title: TaskTitle,
    pub description: String,
    pub completed: bool,
}

impl UpdateTaskCommand {
    pub fn new(title: TaskTitle, description: String, completed: bool) -> Self {
        Self {
            title,
            description,
            completed,
        }
    }
}
