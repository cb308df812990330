use thiserror::Error;

/// Error for TaskId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskIdError {
    #[error("Invalid task ID format: {0}")]
    InvalidFormat(String),

    #[error("Task ID must be positive, got {0}")]
    NotPositive(i64),
}

/// Error for TaskTitle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskTitleError {
    #[error("Title cannot be empty")]
    Empty,

    #[error("Title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for task operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Invalid task ID: {0}")]
    InvalidTaskId(#[from] TaskIdError),

    #[error("Field '{0}' is required")]
    RequiredField(&'static str),

    #[error("Invalid title: {0}")]
    InvalidTitle(TaskTitleError),

    /// Also returned for tasks owned by someone else.
    #[error("Task not found")]
    TaskNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<TaskTitleError> for TaskError {
    fn from(err: TaskTitleError) -> Self {
        match err {
            TaskTitleError::Empty => TaskError::RequiredField("title"),
            other => TaskError::InvalidTitle(other),
        }
    }
}
