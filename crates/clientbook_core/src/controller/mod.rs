//! Controllers binding views to repositories.
//!
//! # Responsibility
//! - Turn raw form text into validated records.
//! - Report user-facing problems through the view, never by panicking.
//! - Re-render the view after every successful change.
//!
//! Views are traits so any front end (terminal, GUI, test double) can drive
//! the same controller.

pub mod client_controller;
pub mod item_controller;
