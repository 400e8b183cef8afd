//! Error types for the tracking engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Rejection of a client-submitted value. The message is safe to return to
/// the client verbatim.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("item id must not be empty")]
    EmptyItemId,

    #[error("interval must be a positive number of days, got {0}")]
    InvalidInterval(i64),

    #[error("ease must be at least 1.0, got {0}")]
    InvalidEase(f64),

    #[error("{field} must be a non-negative count, got {value}")]
    InvalidCount { field: &'static str, value: i64 },

    #[error("correct_reviews ({correct}) cannot exceed total_reviews ({total})")]
    CorrectExceedsTotal { correct: i64, total: i64 },

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("unknown question mode: {0}")]
    UnknownQuestionMode(String),

    #[error("{field} must be at least {min}, got {value}")]
    SettingOutOfRange { field: &'static str, min: i64, value: i64 },
}
