//! Visible list state: rendering and filtering.
//!
//! # Responsibility
//! - Project store tasks into visible items (`renderer`).
//! - Show/hide items by search term and completion status (`filter`).

pub mod filter;
pub mod renderer;
