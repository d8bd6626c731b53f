use thiserror::Error;

use mv_core::UserId;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model configuration error: {0}")]
    Config(String),

    #[error("user {0} has no observations")]
    EmptyHistory(UserId),

    #[error("user {0} has no clustered region")]
    NoRegions(UserId),

    #[error("user {0} has no home-labelled observation")]
    NoHome(UserId),

    #[error("invalid sampling distribution: {0}")]
    Distribution(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
