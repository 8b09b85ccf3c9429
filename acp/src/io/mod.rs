//! I/O helpers for the workflow.

pub mod config;
pub mod confirm;
pub mod runner;
pub mod shell;
