//! Data-access boundary between the dashboard and whatever persists records.
//!
//! A [`HabitStore`] is always bound to one authenticated [`Session`]; every
//! call it answers is implicitly scoped to that user's rows.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::{Habit, HabitLog, HabitPatch, LogPatch, Task, TaskPatch};

/// Coarse classification of a failed store call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Connectivity,
    Timeout,
    Unauthorized,
    Constraint,
    NotFound,
}

impl ErrorKind {
    /// Whether repeating the same call may succeed without user changes
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Connectivity | ErrorKind::Timeout)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Connectivity => "connectivity failure",
            ErrorKind::Timeout => "timed out",
            ErrorKind::Unauthorized => "not authorized",
            ErrorKind::Constraint => "constraint violation",
            ErrorKind::NotFound => "not found",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Store unreachable: {0}")]
    Connectivity(String),
    #[error("Store call timed out: {0}")]
    Timeout(String),
    #[error("Not authorized: {0}")]
    Unauthorized(String),
    #[error("Constraint violated: {0}")]
    Constraint(String),
    #[error("Record not found: {0}")]
    NotFound(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Connectivity(_) => ErrorKind::Connectivity,
            StoreError::Timeout(_) => ErrorKind::Timeout,
            StoreError::Unauthorized(_) => ErrorKind::Unauthorized,
            StoreError::Constraint(_) => ErrorKind::Constraint,
            StoreError::NotFound(_) => ErrorKind::NotFound,
        }
    }

    /// The message without the kind prefix
    pub fn detail(&self) -> &str {
        match self {
            StoreError::Connectivity(m)
            | StoreError::Timeout(m)
            | StoreError::Unauthorized(m)
            | StoreError::Constraint(m)
            | StoreError::NotFound(m) => m,
        }
    }
}

/// Identity of the signed-in user, supplied by the authentication side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user_id: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Result<Self, StoreError> {
        let user_id = user_id.into().trim().to_string();
        if user_id.is_empty() {
            return Err(StoreError::Unauthorized("no signed-in user".to_string()));
        }
        Ok(Self { user_id })
    }

    /// Pick the user from an explicit override, then the configured user,
    /// then the operating system login name.
    pub fn resolve(explicit: Option<&str>, configured: Option<&str>) -> Result<Self, StoreError> {
        let from_env = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .ok();
        let candidate = explicit
            .or(configured)
            .map(str::to_string)
            .or(from_env)
            .unwrap_or_default();
        Self::new(candidate)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Per-user record access. Lists are returned newest first: habits by
/// creation time, logs and tasks by date.
pub trait HabitStore {
    fn session(&self) -> &Session;

    fn list_habits(&self) -> Result<Vec<Habit>, StoreError>;
    fn insert_habit(&self, habit: &Habit) -> Result<i64, StoreError>;
    fn update_habit(&self, id: i64, patch: &HabitPatch) -> Result<(), StoreError>;
    fn delete_habit(&self, id: i64) -> Result<(), StoreError>;

    fn list_logs(&self) -> Result<Vec<HabitLog>, StoreError>;
    fn insert_log(&self, log: &HabitLog) -> Result<i64, StoreError>;
    fn update_log(&self, id: i64, patch: &LogPatch) -> Result<(), StoreError>;
    fn delete_log(&self, id: i64) -> Result<(), StoreError>;
    /// Insert or overwrite the log keyed by (habit_id, date)
    fn upsert_log(&self, log: &HabitLog) -> Result<(), StoreError>;

    fn list_tasks(&self) -> Result<Vec<Task>, StoreError>;
    fn insert_task(&self, task: &Task) -> Result<i64, StoreError>;
    fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<(), StoreError>;
    fn delete_task(&self, id: i64) -> Result<(), StoreError>;
}
