//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record shown in the list and persisted as JSON.
//! - Provide validation for single tasks and whole collections.
//!
//! # Invariants
//! - `id` is unique within a collection and never reassigned.
//! - `text` is never blank after trimming.
//! - Serialized field names stay `id`, `text`, `done`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for one task.
///
/// Derived from a millisecond clock at creation, kept as a plain integer so the
/// stored JSON stays `{"id": number}`.
pub type TaskId = i64;

/// Ordered task collection. Insertion order is display order.
pub type TaskCollection = Vec<Task>;

/// One to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    /// Creates a pending task with caller-provided id.
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            done: false,
        }
    }

    /// Validates single-task invariants.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is blank after trimming.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText(self.id));
        }
        Ok(())
    }
}

/// Validates collection-level invariants (per-task validity and id uniqueness).
pub fn validate_collection(tasks: &[Task]) -> Result<(), TaskValidationError> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        task.validate()?;
        if !seen.insert(task.id) {
            return Err(TaskValidationError::DuplicateId(task.id));
        }
    }
    Ok(())
}

/// Validation errors for task invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyText(TaskId),
    DuplicateId(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText(id) => write!(f, "task {id} has empty text"),
            Self::DuplicateId(id) => write!(f, "duplicate task id {id}"),
        }
    }
}

impl Error for TaskValidationError {}

#[cfg(test)]
mod tests {
    use super::{validate_collection, Task, TaskValidationError};

    #[test]
    fn new_task_starts_pending() {
        let task = Task::new(7, "Buy milk");
        assert_eq!(task.id, 7);
        assert_eq!(task.text, "Buy milk");
        assert!(!task.done);
    }

    #[test]
    fn validate_rejects_whitespace_text() {
        let err = Task::new(1, "   ").validate().unwrap_err();
        assert_eq!(err, TaskValidationError::EmptyText(1));
    }

    #[test]
    fn validate_collection_rejects_duplicate_ids() {
        let tasks = vec![Task::new(1, "a"), Task::new(2, "b"), Task::new(1, "c")];
        assert_eq!(
            validate_collection(&tasks),
            Err(TaskValidationError::DuplicateId(1))
        );
    }

    #[test]
    fn serialized_shape_matches_storage_layout() {
        let mut task = Task::new(1_700_000_000_000, "Walk dog");
        task.done = true;
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(
            json,
            r#"{"id":1700000000000,"text":"Walk dog","done":true}"#
        );
    }

    #[test]
    fn missing_done_field_defaults_to_false() {
        let task: Task = serde_json::from_str(r#"{"id":3,"text":"x"}"#).unwrap();
        assert!(!task.done);
    }
}
