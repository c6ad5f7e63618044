//! Normalization and assembly errors.

use thiserror::Error;

/// A raw batch could not be normalized.
///
/// Every variant fails the whole batch; rows are never skipped silently.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// Category JSON is unparseable or lacks a usable name.
    #[error("malformed category in {source_name} row {row}: {reason}")]
    MalformedCategory {
        source_name: String,
        row: usize,
        reason: String,
    },

    /// Epoch timestamp outside the representable calendar range.
    #[error("invalid {column} timestamp {value} in {source_name} row {row}")]
    InvalidTimestamp {
        source_name: String,
        row: usize,
        column: &'static str,
        value: i64,
    },

    /// Deadline falls on an earlier date than the launch.
    #[error(
        "deadline {deadline} precedes launch {launched_at} in {source_name} row {row}"
    )]
    NegativeDuration {
        source_name: String,
        row: usize,
        launched_at: i64,
        deadline: i64,
    },
}

/// Errors raised while assembling a training table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssembleError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// A non-terminal state reached label mapping.
    ///
    /// Normalization filters these out, so this indicates a broken invariant
    /// upstream (for example a store holding unfiltered rows).
    #[error("unexpected campaign state '{state}' for '{name}' at label mapping")]
    UnexpectedState { name: String, state: String },
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
