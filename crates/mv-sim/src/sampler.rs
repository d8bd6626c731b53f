//! The `Sampler` and its per-user simulation loop.

use tracing::{debug, info};

use mv_core::{UserRng, Visit, VisitKind};
use mv_model::{DailyTripSampler, Population, PreferentialReturn, Step, UserHistory};

use crate::{SampleObserver, SamplerConfig, SimError, SimResult};

/// Totals of one sampling run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleSummary {
    pub users:        usize,
    pub visits:       usize,
    /// Visits produced by the exploration branch.
    pub explorations: usize,
}

/// Simulates visit sequences for every user of a population.
///
/// For each user the model is re-fitted on that user's own history.  Every
/// day starts with a timeslot-0 visit at the user's home, followed by a
/// drawn number of steps, each conditioned on the previous one.
///
/// Users are independent: each gets a fresh [`PreferentialReturn`] and its
/// own [`UserRng`], so the result does not depend on user order or on
/// whether the `parallel` feature is enabled.
///
/// Create via [`SamplerBuilder`][crate::SamplerBuilder].
pub struct Sampler {
    pub(crate) config: SamplerConfig,
    pub(crate) daily:  DailyTripSampler,
}

impl Sampler {
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Simulate one user.
    pub fn sample_user(&self, history: &UserHistory) -> SimResult<Vec<Visit>> {
        let user = history.user();
        let wrap = |source| SimError::User { user, source };

        let mut model = PreferentialReturn::fit(&self.config.model, history).map_err(wrap)?;
        let home = Step::at(history.home().map_err(wrap)?);
        let mut rng = UserRng::new(self.config.seed, user);

        let mut visits = Vec::new();
        for day in 0..self.config.n_days {
            let mut prev = home;
            visits.push(to_visit(history, day, 0, &prev));

            let trips = self.daily.sample(&mut rng);
            for timeslot in 1..=trips {
                prev = model.next(&prev, &mut rng);
                visits.push(to_visit(history, day, timeslot, &prev));
            }
        }

        debug!(%user, visits = visits.len(), s = model.s(), "user sampled");
        Ok(visits)
    }

    /// Simulate every user and return all visits, sorted by
    /// `(user, day, timeslot)`.
    pub fn sample(&self, population: &Population) -> SimResult<Vec<Visit>> {
        Ok(self.simulate(population)?.into_iter().flatten().collect())
    }

    /// Simulate every user, reporting each trajectory to `observer`.
    pub fn run<O: SampleObserver>(
        &self,
        population: &Population,
        observer:   &mut O,
    ) -> SimResult<SampleSummary> {
        let per_user = self.simulate(population)?;

        observer.on_run_start(per_user.len());
        let mut summary = SampleSummary { users: per_user.len(), ..SampleSummary::default() };
        for (history, visits) in population.iter().zip(&per_user) {
            summary.visits += visits.len();
            summary.explorations += visits.iter().filter(|v| v.kind == VisitKind::Point).count();
            observer.on_user_end(history.user(), visits);
        }
        observer.on_run_end(&summary);

        info!(
            users = summary.users,
            visits = summary.visits,
            explorations = summary.explorations,
            n_days = self.config.n_days,
            "sampling finished"
        );
        Ok(summary)
    }

    /// One trajectory per user, in ascending `UserId` order.
    fn simulate(&self, population: &Population) -> SimResult<Vec<Vec<Visit>>> {
        #[cfg(not(feature = "parallel"))]
        {
            population.iter().map(|h| self.sample_user(h)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let histories: Vec<&UserHistory> = population.iter().collect();
            histories.par_iter().map(|h| self.sample_user(h)).collect()
        }
    }
}

fn to_visit(history: &UserHistory, day: u32, timeslot: u32, step: &Step) -> Visit {
    Visit {
        user: history.user(),
        day,
        timeslot,
        kind: step.kind,
        location: step.location,
        region: step.region,
        created_at: None,
    }
}
