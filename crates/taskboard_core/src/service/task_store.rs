//! Task store use-case service.
//!
//! # Responsibility
//! - Own the authoritative in-memory task collection.
//! - Provide add/update/remove/toggle mutations with write-through persistence.
//!
//! # Invariants
//! - Every mutating call persists the full collection before returning.
//! - Issued ids are strictly increasing, even when the clock stalls or goes back.
//!   Once `TaskId::MAX` is taken, new ids fill the lowest free slot instead.
//! - An issued id never duplicates one already in the collection.
//! - Missing ids are no-ops, not errors.

use crate::model::task::{Task, TaskCollection, TaskId};
use crate::repo::kv_repo::{KeyValueRepository, RepoError};
use crate::repo::task_persistence::TaskPersistence;
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for task mutations.
#[derive(Debug)]
pub enum StoreError {
    /// Text is blank after trimming; nothing was changed.
    EmptyText,
    /// In-memory change applied, but the write-through failed.
    Persistence(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text cannot be empty"),
            Self::Persistence(err) => write!(f, "failed to persist tasks: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyText => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

/// Millisecond clock used to derive task ids.
pub type IdClock = Box<dyn Fn() -> TaskId>;

/// Allocates clock-derived, strictly increasing task ids.
pub struct TaskIdAllocator {
    last_issued: TaskId,
    clock: IdClock,
}

impl TaskIdAllocator {
    /// Creates an allocator on the system clock, never issuing ids `<= seed`.
    pub fn system(seed: TaskId) -> Self {
        Self::with_clock(seed, Box::new(system_epoch_ms))
    }

    pub fn with_clock(seed: TaskId, clock: IdClock) -> Self {
        Self {
            last_issued: seed,
            clock,
        }
    }

    /// Returns `max(clock_ms, last_issued + 1)`, or `None` once `TaskId::MAX`
    /// has been issued.
    pub fn next_id(&mut self) -> Option<TaskId> {
        let floor = self.last_issued.checked_add(1)?;
        let id = (self.clock)().max(floor);
        self.last_issued = id;
        Some(id)
    }
}

fn system_epoch_ms() -> TaskId {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| TaskId::try_from(elapsed.as_millis()).unwrap_or(TaskId::MAX))
        .unwrap_or(0)
}

/// In-memory ordered task collection with write-through persistence.
pub struct TaskStore<R: KeyValueRepository> {
    persistence: TaskPersistence<R>,
    tasks: TaskCollection,
    ids: TaskIdAllocator,
}

impl<R: KeyValueRepository> TaskStore<R> {
    /// Loads the persisted collection and seeds id allocation from it.
    pub fn open(persistence: TaskPersistence<R>) -> Self {
        let tasks = persistence.load();
        let ids = TaskIdAllocator::system(max_id(&tasks));
        Self {
            persistence,
            tasks,
            ids,
        }
    }

    /// Same as [`TaskStore::open`] with an injected id clock.
    pub fn open_with_clock(persistence: TaskPersistence<R>, clock: IdClock) -> Self {
        let tasks = persistence.load();
        let ids = TaskIdAllocator::with_clock(max_id(&tasks), clock);
        Self {
            persistence,
            tasks,
            ids,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn persistence(&self) -> &TaskPersistence<R> {
        &self.persistence
    }

    /// Returns the first task whose text equals `text` exactly.
    ///
    /// Duplicate texts resolve to the earliest task.
    pub fn find_by_text(&self, text: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.text == text)
    }

    /// Appends a new pending task and persists.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is blank; nothing is stored.
    /// - `Persistence` when the write fails; the task stays in memory.
    pub fn add(&mut self, text: &str) -> StoreResult<Task> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::EmptyText);
        }

        let task = Task::new(self.allocate_id(), text);
        self.tasks.push(task.clone());
        info!(
            "event=task_add module=store status=ok task_id={} text_len={}",
            task.id,
            text.chars().count()
        );
        self.persist()?;
        Ok(task)
    }

    /// Removes the task with `id`. Returns whether a task was removed.
    pub fn remove(&mut self, id: TaskId) -> StoreResult<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let removed = self.tasks.len() != before;
        info!("event=task_remove module=store status=ok task_id={id} found={removed}");
        self.persist()?;
        Ok(removed)
    }

    /// Replaces the text of task `id`, keeping `done`. Returns whether it exists.
    ///
    /// # Errors
    /// - `EmptyText` when `new_text` is blank; nothing is changed.
    pub fn update(&mut self, id: TaskId, new_text: &str) -> StoreResult<bool> {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return Err(StoreError::EmptyText);
        }

        let found = match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.text = new_text.to_string();
                true
            }
            None => false,
        };
        info!(
            "event=task_update module=store status=ok task_id={id} found={found} text_len={}",
            new_text.chars().count()
        );
        self.persist()?;
        Ok(found)
    }

    /// Flips `done` on task `id`. Returns the new state, or `None` when absent.
    pub fn toggle_done(&mut self, id: TaskId) -> StoreResult<Option<bool>> {
        let done = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .map(|task| {
                task.done = !task.done;
                task.done
            });
        info!(
            "event=task_toggle module=store status=ok task_id={id} done={}",
            done.map_or("missing", |done| if done { "true" } else { "false" })
        );
        self.persist()?;
        Ok(done)
    }

    fn allocate_id(&mut self) -> TaskId {
        if let Some(id) = self.ids.next_id() {
            return id;
        }
        let id = lowest_free_id(&self.tasks);
        warn!("event=task_id_alloc module=store status=exhausted fallback_id={id}");
        id
    }

    fn persist(&self) -> StoreResult<()> {
        self.persistence.save(&self.tasks).map_err(|err| {
            error!(
                "event=tasks_save module=store status=error count={} error={err}",
                self.tasks.len()
            );
            StoreError::Persistence(err)
        })
    }
}

fn max_id(tasks: &[Task]) -> TaskId {
    tasks.iter().map(|task| task.id).max().unwrap_or(0)
}

/// Smallest positive id not held by any task. At most `tasks.len()` ids are
/// taken, so the scan stops by `tasks.len() + 1`.
fn lowest_free_id(tasks: &[Task]) -> TaskId {
    let taken: HashSet<TaskId> = tasks.iter().map(|task| task.id).collect();
    (1..=TaskId::MAX)
        .find(|id| !taken.contains(id))
        .unwrap_or(TaskId::MIN)
}
