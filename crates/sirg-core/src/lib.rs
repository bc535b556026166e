//! Core types for the security-investigation report generator.
//!
//! Holds the canonical ticket schema, the error taxonomy, command-line
//! settings, timestamp parsing and the reporting-window resolver shared by
//! the data, output and runtime crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
pub mod window;

pub use error::{ReportError, Result};
