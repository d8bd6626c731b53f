//! The `VisitWriter` trait implemented by all backend writers.

use crate::{OutputResult, VisitRow};

/// Trait implemented by the CSV, SQLite and Parquet visit writers.
///
/// When driven by a sampler run, errors surface through
/// [`VisitOutputObserver::take_error`][crate::VisitOutputObserver::take_error].
pub trait VisitWriter {
    /// Append a batch of visits (typically one user's trajectory).
    fn write_visits(&mut self, rows: &[VisitRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
