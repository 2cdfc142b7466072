//! Error taxonomy for validation, persistence, and expression evaluation.

use thiserror::Error;

use crate::record::Subject;

/// A rejected calculation request. Always recoverable; names the offending
/// field so the caller can report it.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("missing name: student name must be non-empty")]
    MissingName,

    #[error("non-numeric mark for {subject}: {value:?}")]
    NonNumericMark { subject: Subject, value: String },

    #[error("mark for {subject} out of range: {mark} is not within 0-100")]
    OutOfRange { subject: Subject, mark: f64 },
}

/// A failed ledger write. The computed record stays valid; already-written
/// rows are never corrupted by a later failure.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to open CSV export")]
    Io(#[from] std::io::Error),

    #[error("failed to append CSV row")]
    Csv(#[from] csv::Error),

    #[error("history store failure")]
    Store(#[from] sqlx::Error),

    #[error("failed to serialize subject marks")]
    Marks(#[from] serde_json::Error),
}

/// A rejected or failed arithmetic expression.
#[derive(Debug, Error, PartialEq)]
pub enum ExprError {
    #[error("empty expression")]
    Empty,

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),

    #[error("expected a number")]
    MissingOperand,

    #[error("unexpected trailing input")]
    TrailingInput,

    #[error("division by zero")]
    DivisionByZero,
}
