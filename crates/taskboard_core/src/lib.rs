//! Core domain logic for TaskBoard.
//! This crate is the single source of truth for task list invariants.

pub mod app;
pub mod config;
pub mod controller;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use app::{init_logging_from_config, launch, open_database};
pub use config::{ConfigError, CoreConfig, DbLocation};
pub use controller::interaction::{EditTarget, TaskController, DELETE_CONFIRM_PROMPT};
pub use controller::surface::{FormMode, TaskView, UiEvent};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Task, TaskCollection, TaskId, TaskValidationError};
pub use repo::kv_repo::{
    KeyValueRepository, MemoryKeyValueRepository, RepoError, RepoResult,
    SqliteKeyValueRepository,
};
pub use repo::task_persistence::{TaskPersistence, DEFAULT_STORAGE_KEY};
pub use service::task_store::{StoreError, StoreResult, TaskIdAllocator, TaskStore};
pub use view::filter::{StatusFilter, ViewFilter};
pub use view::renderer::{ItemAction, ItemKey, Renderer, VisibleItem};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
