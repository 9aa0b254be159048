//! Domain model for the task list.
//!
//! # Responsibility
//! - Define canonical data structures used by store, renderer and persistence.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod task;
