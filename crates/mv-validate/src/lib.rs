//! `mv-validate` — scoring a simulated ODM against ground truth.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`metrics`] | `DistanceMetrics::compute` → `MetricsTable` (sum/mean/var)    |
//! | [`kl`]      | `kullback_leibler`, zero-bin merging, `KL_UNDEFINED` sentinel |
//! | [`spssim`]  | per-quantile structural similarity                            |
//! | [`error`]   | `ValidateError`, `ValidateResult<T>`                          |
//!
//! # Pipeline
//!
//! ```text
//! ZoneDistances ──► DistanceQuantiles (q ≈ 100, once per zone set)
//!                          │
//! ground-truth ODM ──┐     ▼
//!                    ├─► MetricsTable ──► kullback_leibler ──► f64 | 999
//! model ODM ─────────┘
//!
//! ground truth, model, DistanceQuantiles (q = 20) ──► spssim ──► SpssimReport
//! ```
//!
//! Inputs are checked explicitly: series must line up by length and title,
//! and values must be finite and non-negative.

pub mod error;
pub mod kl;
pub mod metrics;
pub mod spssim;

#[cfg(test)]
mod tests;

pub use error::{ValidateError, ValidateResult};
pub use kl::{kl_divergence, kullback_leibler, merge_zero_bins, KL_UNDEFINED};
pub use metrics::{BinMetrics, DistanceMetrics, MetricsTable, SeriesStats};
pub use spssim::{spssim, SpssimBin, SpssimReport, DEFAULT_SPSSIM_QUANTILES};
