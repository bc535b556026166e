use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

/// All errors produced while building a ticket report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The input export could not be opened or read from disk.
    #[error("Failed to read input {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input export was readable but not a well-formed table.
    #[error("Failed to parse input {path}: {reason}")]
    InputParse { path: PathBuf, reason: String },

    /// The input file extension is not one the loader understands.
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(PathBuf),

    /// A column the canonical schema relies on is absent from the header.
    #[error("Input {path} is missing required column \"{column}\"")]
    MissingColumn { path: PathBuf, column: String },

    /// A row carries a timestamp that matches none of the accepted formats.
    #[error("Invalid timestamp in row {row}, column {column}: \"{value}\"")]
    TimestampParse {
        row: usize,
        column: String,
        value: String,
    },

    /// A user-supplied window boundary could not be parsed.
    #[error("Invalid report window boundary \"{0}\" (expected yyyy-mm-dd hh:mm)")]
    WindowBoundary(String),

    /// Filtering left no tickets, so the report has no date range to name it by.
    #[error("No tickets left in the report window {start} - {end}")]
    EmptyResult {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// An output file could not be written.
    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    /// The requested HTML colour theme does not exist.
    #[error("Unknown theme: {0}")]
    InvalidTheme(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReportError {
    /// Build a [`ReportError::Write`] from any displayable cause.
    pub fn write(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        ReportError::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience alias used throughout the sirg crates.
pub type Result<T> = std::result::Result<T, ReportError>;
