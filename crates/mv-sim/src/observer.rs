//! Sampler observer trait for progress reporting and streaming output.

use mv_core::{UserId, Visit};

use crate::SampleSummary;

/// Callbacks invoked by [`Sampler::run`][crate::Sampler::run].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Per-user callbacks arrive in ascending
/// `UserId` order even when users are simulated in parallel.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct Progress { every: usize, seen: usize }
///
/// impl SampleObserver for Progress {
///     fn on_user_end(&mut self, user: UserId, visits: &[Visit]) {
///         self.seen += 1;
///         if self.seen % self.every == 0 {
///             println!("{} users done ({user}: {} visits)", self.seen, visits.len());
///         }
///     }
/// }
/// ```
pub trait SampleObserver {
    /// Called once before any user is reported.
    fn on_run_start(&mut self, _users: usize) {}

    /// Called with each user's complete simulated trajectory.
    fn on_user_end(&mut self, _user: UserId, _visits: &[Visit]) {}

    /// Called once after the last user.
    fn on_run_end(&mut self, _summary: &SampleSummary) {}
}

/// A [`SampleObserver`] that does nothing.
pub struct NoopObserver;

impl SampleObserver for NoopObserver {}
