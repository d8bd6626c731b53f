use mv_core::UserId;
use mv_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("sampler configuration error: {0}")]
    Config(String),

    #[error("invalid model configuration: {0}")]
    Model(#[from] ModelError),

    #[error("user {user}: {source}")]
    User {
        user:   UserId,
        #[source]
        source: ModelError,
    },
}

pub type SimResult<T> = Result<T, SimError>;
