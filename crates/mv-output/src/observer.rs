//! `VisitOutputObserver<W>`: bridges `SampleObserver` to a `VisitWriter`.

use tracing::info;

use mv_core::{UserId, Visit};
use mv_sim::{SampleObserver, SampleSummary};

use crate::writer::VisitWriter;
use crate::{OutputError, OutputResult, VisitRow};

/// A [`SampleObserver`] that streams each user's trajectory to any
/// [`VisitWriter`] backend and finishes the writer when the run ends.
///
/// Observer callbacks cannot fail, so writer errors are stored.  After
/// `sampler.run()` returns, check for them with
/// [`take_error`][Self::take_error].  Once a write has failed, later users
/// are not written.
pub struct VisitOutputObserver<W: VisitWriter> {
    writer:     W,
    rows:       usize,
    last_error: Option<OutputError>,
}

impl<W: VisitWriter> VisitOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: 0, last_error: None }
    }

    /// Take the stored write error (if any) after the run returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Visits successfully written so far.
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: VisitWriter> SampleObserver for VisitOutputObserver<W> {
    fn on_user_end(&mut self, _user: UserId, visits: &[Visit]) {
        if self.last_error.is_some() || visits.is_empty() {
            return;
        }
        let rows: Vec<VisitRow> = visits.iter().map(VisitRow::from).collect();
        let result = self.writer.write_visits(&rows);
        if result.is_ok() {
            self.rows += rows.len();
        }
        self.store_err(result);
    }

    fn on_run_end(&mut self, summary: &SampleSummary) {
        let result = self.writer.finish();
        self.store_err(result);
        info!(users = summary.users, rows = self.rows, "visits written");
    }
}
