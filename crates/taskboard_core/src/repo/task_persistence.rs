//! Task collection persistence adapter.
//!
//! # Responsibility
//! - Read/write the whole task collection as JSON under one storage key.
//! - Recover from corrupt stored data by resetting it to an empty collection.
//!
//! # Invariants
//! - `load` never returns an error to its caller.
//! - `save` always writes the full collection; there is no diffing.
//! - A stored collection violating task invariants is treated as corrupt.

use crate::model::task::{validate_collection, Task, TaskCollection, TaskValidationError};
use crate::repo::kv_repo::{KeyValueRepository, RepoResult};
use log::{debug, error, info, warn};
use std::fmt::{Display, Formatter};

/// Storage key used by the browser build; kept for data compatibility.
pub const DEFAULT_STORAGE_KEY: &str = "minhastarefas";

const EMPTY_COLLECTION_JSON: &str = "[]";

/// Reads and writes the task collection through a key-value repository.
pub struct TaskPersistence<R: KeyValueRepository> {
    repo: R,
    key: String,
}

impl<R: KeyValueRepository> TaskPersistence<R> {
    pub fn new(repo: R, key: impl Into<String>) -> Self {
        Self {
            repo,
            key: key.into(),
        }
    }

    /// Storage key this adapter reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying key-value repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Loads the stored collection.
    ///
    /// - Missing value: empty collection.
    /// - Corrupt value: logged, stored value reset to `[]`, empty collection.
    /// - Storage read failure: logged, stored value left untouched, empty
    ///   collection.
    pub fn load(&self) -> TaskCollection {
        let raw = match self.repo.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=tasks_load module=persistence status=empty");
                return TaskCollection::new();
            }
            Err(err) => {
                error!(
                    "event=tasks_load module=persistence status=error error_code=read_failed error={err}"
                );
                return TaskCollection::new();
            }
        };

        match decode_collection(&raw) {
            Ok(tasks) => {
                info!(
                    "event=tasks_load module=persistence status=ok count={}",
                    tasks.len()
                );
                tasks
            }
            Err(err) => {
                warn!(
                    "event=tasks_load module=persistence status=reset error_code=corrupt_data bytes={} error={err}",
                    raw.len()
                );
                if let Err(reset_err) = self.repo.set(&self.key, EMPTY_COLLECTION_JSON) {
                    error!(
                        "event=tasks_reset module=persistence status=error error={reset_err}"
                    );
                }
                TaskCollection::new()
            }
        }
    }

    /// Serializes and writes the full collection, replacing the stored value.
    ///
    /// # Errors
    /// - `Encode` when serialization fails.
    /// - `Db`/`Unavailable` when the backing store rejects the write.
    pub fn save(&self, tasks: &[Task]) -> RepoResult<()> {
        let json = serde_json::to_string(tasks)?;
        self.repo.set(&self.key, &json)?;
        debug!(
            "event=tasks_save module=persistence status=ok count={} bytes={}",
            tasks.len(),
            json.len()
        );
        Ok(())
    }
}

#[derive(Debug)]
enum DecodeError {
    Json(serde_json::Error),
    Invalid(TaskValidationError),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "{err}"),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

fn decode_collection(raw: &str) -> Result<TaskCollection, DecodeError> {
    let tasks: TaskCollection = serde_json::from_str(raw).map_err(DecodeError::Json)?;
    validate_collection(&tasks).map_err(DecodeError::Invalid)?;
    Ok(tasks)
}
