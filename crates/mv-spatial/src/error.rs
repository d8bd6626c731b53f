//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `mv-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("zone set is empty")]
    EmptyZoneSet,

    #[error("zone {0:?} appears more than once")]
    DuplicateZone(String),

    #[error("zone {0:?} has no area")]
    DegenerateZone(String),

    #[error("distance matrix has {got} cells, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("distance for zone pair #{0} is not a finite non-negative number")]
    InvalidDistance(usize),

    #[error("quantile count must be at least 1, got {0}")]
    InvalidQuantileCount(usize),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
