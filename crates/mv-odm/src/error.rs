//! ODM error type.

use mv_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OdmError {
    #[error("matrix has {got} cells, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("cell #{0} is not a finite non-negative number")]
    InvalidValue(usize),

    #[error("matrix has no mass to normalize ({0})")]
    Empty(&'static str),

    #[error("invalid gravity model parameter: {0}")]
    Config(String),

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

pub type OdmResult<T> = Result<T, OdmError>;
