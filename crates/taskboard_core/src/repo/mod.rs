//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the local key-value storage contract.
//! - Map the task collection onto one serialized value.
//!
//! # Invariants
//! - Only `task_persistence` knows the serialized collection format.

pub mod kv_repo;
pub mod task_persistence;
