//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level task functions to Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` + message, never panics.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Calls touching storage are serialized; each call loads, mutates and
//!   writes the whole collection.

use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use taskboard_core::config::ENV_DB_PATH;
use taskboard_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_database,
    ping as ping_inner, CoreConfig, DbLocation, Renderer, SqliteKeyValueRepository, StatusFilter,
    TaskId, TaskPersistence, TaskStore, ViewFilter,
};

const ENTRY_DB_FILE_NAME: &str = "taskboard_entry.sqlite3";

struct EntryStorage {
    location: DbLocation,
    storage_key: String,
}

static ENTRY_STORAGE: OnceLock<EntryStorage> = OnceLock::new();
static ENTRY_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One row of the task list as the host should draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTaskItem {
    pub task_id: i64,
    pub text: String,
    pub done: bool,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTaskListResponse {
    /// Tasks passing both search and status filters, in display order.
    pub items: Vec<EntryTaskItem>,
    /// Number of stored tasks before filtering.
    pub total: u32,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected task id, when one exists.
    pub task_id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl EntryActionResponse {
    fn success(message: impl Into<String>, task_id: Option<TaskId>) -> Self {
        Self {
            ok: true,
            task_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// Lists tasks filtered by `search` (raw, case-insensitive) and `status`
/// (`all|done|pending`; unknown values mean `all`).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_list_tasks(search: String, status: String) -> EntryTaskListResponse {
    let mode = StatusFilter::parse(&status).unwrap_or_else(|| {
        warn!("event=entry_list module=ffi status=fallback reason=unknown_filter");
        StatusFilter::All
    });

    let result = with_task_store(|store| {
        let mut renderer = Renderer::new();
        renderer.render_all(store.tasks());
        let mut filter = ViewFilter::new();
        filter.filter_by_status(&mut renderer, mode);
        filter.search(&mut renderer, &search);

        let items = renderer
            .visible_items()
            .map(|item| EntryTaskItem {
                task_id: item.task_id,
                text: item.label.clone(),
                done: item.done,
            })
            .collect::<Vec<_>>();
        Ok((items, store.len()))
    });

    match result {
        Ok((items, total)) => {
            let message = if items.is_empty() {
                "No tasks.".to_string()
            } else {
                format!("Showing {} of {} task(s).", items.len(), total)
            };
            EntryTaskListResponse {
                items,
                total: u32::try_from(total).unwrap_or(u32::MAX),
                message,
            }
        }
        Err(err) => EntryTaskListResponse {
            items: Vec::new(),
            total: 0,
            message: format!("entry_list_tasks failed: {err}"),
        },
    }
}

/// Adds a pending task. Blank text is rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_add_task(text: String) -> EntryActionResponse {
    match with_task_store(|store| store.add(&text).map_err(|err| err.to_string())) {
        Ok(task) => EntryActionResponse::success("Task added.", Some(task.id)),
        Err(err) => EntryActionResponse::failure(format!("entry_add_task failed: {err}")),
    }
}

/// Flips the done flag. A missing id succeeds with `task_id = None`.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_toggle_task(task_id: i64) -> EntryActionResponse {
    match with_task_store(|store| store.toggle_done(task_id).map_err(|err| err.to_string())) {
        Ok(Some(true)) => EntryActionResponse::success("Task completed.", Some(task_id)),
        Ok(Some(false)) => EntryActionResponse::success("Task reopened.", Some(task_id)),
        Ok(None) => EntryActionResponse::success("No such task.", None),
        Err(err) => EntryActionResponse::failure(format!("entry_toggle_task failed: {err}")),
    }
}

/// Replaces task text. Blank text is rejected; a missing id is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_update_task(task_id: i64, text: String) -> EntryActionResponse {
    match with_task_store(|store| store.update(task_id, &text).map_err(|err| err.to_string())) {
        Ok(true) => EntryActionResponse::success("Task updated.", Some(task_id)),
        Ok(false) => EntryActionResponse::success("No such task.", None),
        Err(err) => EntryActionResponse::failure(format!("entry_update_task failed: {err}")),
    }
}

/// Deletes a task. The host is expected to confirm with the user first.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_delete_task(task_id: i64) -> EntryActionResponse {
    match with_task_store(|store| store.remove(task_id).map_err(|err| err.to_string())) {
        Ok(true) => EntryActionResponse::success("Task deleted.", Some(task_id)),
        Ok(false) => EntryActionResponse::success("No such task.", None),
        Err(err) => EntryActionResponse::failure(format!("entry_delete_task failed: {err}")),
    }
}

fn resolve_entry_storage() -> &'static EntryStorage {
    ENTRY_STORAGE.get_or_init(|| {
        let storage_key = match CoreConfig::from_env() {
            Ok(config) => config.storage_key,
            Err(err) => {
                warn!("event=entry_config module=ffi status=fallback error={err}");
                CoreConfig::default().storage_key
            }
        };
        EntryStorage {
            location: resolve_entry_location(std::env::var(ENV_DB_PATH).ok().as_deref()),
            storage_key,
        }
    })
}

/// Maps the `TASKBOARD_DB_PATH` setting to the entry database.
///
/// Each FFI call opens its own connection, so `:memory:` would drop every
/// write; it falls back to the default file instead.
fn resolve_entry_location(setting: Option<&str>) -> DbLocation {
    let Some(value) = setting.map(str::trim).filter(|value| !value.is_empty()) else {
        return DbLocation::File(entry_default_db_path());
    };
    match DbLocation::parse(value) {
        DbLocation::Memory => {
            warn!("event=entry_config module=ffi status=fallback reason=memory_db_unsupported");
            DbLocation::File(entry_default_db_path())
        }
        location => location,
    }
}

fn entry_default_db_path() -> PathBuf {
    std::env::temp_dir().join(ENTRY_DB_FILE_NAME)
}

fn with_task_store<T>(
    f: impl FnOnce(&mut TaskStore<SqliteKeyValueRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let _guard = ENTRY_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let storage = resolve_entry_storage();
    let conn =
        open_database(&storage.location).map_err(|err| format!("entry DB open failed: {err}"))?;
    let persistence = TaskPersistence::new(
        SqliteKeyValueRepository::new(&conn),
        storage.storage_key.as_str(),
    );
    let mut store = TaskStore::open(persistence);
    f(&mut store)
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, entry_add_task, entry_default_db_path, entry_delete_task, entry_list_tasks,
        entry_toggle_task, entry_update_task, init_logging, ping, resolve_entry_location,
    };
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};
    use taskboard_core::DbLocation;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn add_then_list_finds_task_by_search() {
        let token = unique_token("entry-list");
        let created = entry_add_task(format!("  note {token} "));
        assert!(created.ok, "{}", created.message);
        let task_id = created.task_id.expect("add should return task_id");

        let response = entry_list_tasks(token.to_uppercase(), "all".to_string());
        assert_eq!(response.items.len(), 1, "{}", response.message);
        assert_eq!(response.items[0].task_id, task_id);
        assert_eq!(response.items[0].text, format!("note {token}"));
        assert!(response.total >= 1);
    }

    #[test]
    fn toggle_moves_task_between_status_filters() {
        let token = unique_token("entry-toggle");
        let task_id = entry_add_task(token.clone()).task_id.expect("task id");

        let pending = entry_list_tasks(token.clone(), "pending".to_string());
        assert_eq!(pending.items.len(), 1);

        let toggled = entry_toggle_task(task_id);
        assert!(toggled.ok, "{}", toggled.message);
        assert_eq!(toggled.message, "Task completed.");

        assert!(entry_list_tasks(token.clone(), "pending".to_string())
            .items
            .is_empty());
        let done = entry_list_tasks(token, "done".to_string());
        assert_eq!(done.items.len(), 1);
        assert!(done.items[0].done);
    }

    #[test]
    fn update_and_delete_round_trip() {
        let token = unique_token("entry-update");
        let task_id = entry_add_task(token.clone()).task_id.expect("task id");

        let renamed = format!("{token}-renamed");
        assert!(entry_update_task(task_id, renamed.clone()).ok);
        let listed = entry_list_tasks(renamed.clone(), String::new());
        assert_eq!(listed.items[0].text, renamed);

        let deleted = entry_delete_task(task_id);
        assert!(deleted.ok);
        assert_eq!(deleted.task_id, Some(task_id));
        assert!(entry_list_tasks(token, "all".to_string()).items.is_empty());

        let again = entry_delete_task(task_id);
        assert!(again.ok);
        assert_eq!(again.task_id, None);
    }

    #[test]
    fn blank_text_is_rejected() {
        let response = entry_add_task("   ".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("empty"));

        let update = entry_update_task(1, " ".to_string());
        assert!(!update.ok);
    }

    #[test]
    fn entry_location_uses_path_setting_verbatim() {
        assert_eq!(
            resolve_entry_location(Some(" /data/tasks.sqlite3 ")),
            DbLocation::File(PathBuf::from("/data/tasks.sqlite3"))
        );
    }

    #[test]
    fn entry_location_defaults_when_unset_or_blank() {
        let default = DbLocation::File(entry_default_db_path());
        assert_eq!(resolve_entry_location(None), default);
        assert_eq!(resolve_entry_location(Some("  ")), default);
    }

    #[test]
    fn entry_location_never_uses_memory_db() {
        assert_eq!(
            resolve_entry_location(Some(":memory:")),
            DbLocation::File(entry_default_db_path())
        );
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
