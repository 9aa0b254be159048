//! Application root wiring.
//!
//! # Responsibility
//! - Open storage and logging from a [`CoreConfig`].
//! - Build the task store and inject it into a controller for one host view.
//!
//! # Invariants
//! - The store is loaded exactly once, before the first render.
//! - No module-level task state exists; each controller owns its store.

use crate::config::{CoreConfig, DbLocation};
use crate::controller::interaction::TaskController;
use crate::controller::surface::TaskView;
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::init_logging;
use crate::repo::kv_repo::KeyValueRepository;
use crate::repo::task_persistence::TaskPersistence;
use crate::service::task_store::TaskStore;
use log::info;
use rusqlite::Connection;

/// Opens the configured SQLite database with migrations applied.
pub fn open_database(location: &DbLocation) -> DbResult<Connection> {
    match location {
        DbLocation::File(path) => open_db(path),
        DbLocation::Memory => open_db_in_memory(),
    }
}

/// Starts file logging when `config.log_dir` is set.
///
/// Returns `Ok(false)` when file logging is disabled by config.
pub fn init_logging_from_config(config: &CoreConfig) -> Result<bool, String> {
    let Some(dir) = &config.log_dir else {
        return Ok(false);
    };
    let dir = dir
        .to_str()
        .ok_or_else(|| format!("log_dir is not valid UTF-8: `{}`", dir.display()))?;
    init_logging(&config.log_level, dir)?;
    Ok(true)
}

/// Loads the store under `storage_key`, wires it to `view` and renders it.
pub fn launch<R, V>(repo: R, storage_key: &str, view: V) -> TaskController<R, V>
where
    R: KeyValueRepository,
    V: TaskView,
{
    let store = TaskStore::open(TaskPersistence::new(repo, storage_key));
    info!(
        "event=app_start module=app status=ok task_count={}",
        store.len()
    );
    let mut controller = TaskController::new(store, view);
    controller.start();
    controller
}
