//! Flutter bridge crate for TaskBoard core.

pub mod api;
