//! Validation error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("{what}: expected length {expected}, got {got}")]
    LengthMismatch {
        what:     &'static str,
        expected: usize,
        got:      usize,
    },

    #[error("no series titled {0:?}")]
    UnknownTitle(String),

    #[error("series title {0:?} used twice")]
    DuplicateTitle(String),

    #[error("{series}[{index}] is not a finite non-negative number")]
    InvalidValue { series: &'static str, index: usize },

    #[error("{series} is not normalized (total {total})")]
    NotNormalized { series: &'static str, total: f64 },

    #[error("every bin is zero in both series")]
    AllZero,

    #[error("degenerate input: {0}")]
    Degenerate(&'static str),
}

pub type ValidateResult<T> = Result<T, ValidateError>;
