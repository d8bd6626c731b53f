//! Error type for `mv-core`.

use thiserror::Error;

/// Failures of the core record types (currently only parsing their textual
/// forms, e.g. a visit kind or label read from a file).
#[derive(Debug, Error)]
pub enum MvError {
    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `mv-core`.
pub type MvResult<T> = Result<T, MvError>;
