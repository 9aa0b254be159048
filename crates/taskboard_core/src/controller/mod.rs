//! User interaction layer.
//!
//! # Responsibility
//! - Define the host surface contract (`surface`).
//! - Drive store, renderer and filters from user gestures (`interaction`).

pub mod interaction;
pub mod surface;
