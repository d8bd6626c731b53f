//! Per-user observation histories and population-level preparation.

use std::collections::BTreeMap;

use tracing::info;

use mv_core::{GeoPoint, Label, Observation, RegionId, UserId, Visit, VisitKind};

use crate::{ModelError, ModelResult};

const SECONDS_PER_DAY: i64 = 86_400;

// ── RegionSummary ─────────────────────────────────────────────────────────────

/// One distinct clustered region of a user.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RegionSummary {
    pub region: RegionId,
    /// Location of the region's chronologically first observation.
    pub point:  GeoPoint,
    /// Number of observations in the region.
    pub count:  usize,
}

// ── UserHistory ───────────────────────────────────────────────────────────────

/// A single user's observations, sorted chronologically.
#[derive(Clone, Debug)]
pub struct UserHistory {
    user:         UserId,
    observations: Vec<Observation>,
}

impl UserHistory {
    /// Build from a user's observations (any order).
    ///
    /// Observations belonging to other users are an error, as is an empty
    /// history.
    pub fn new(user: UserId, mut observations: Vec<Observation>) -> ModelResult<Self> {
        if observations.is_empty() {
            return Err(ModelError::EmptyHistory(user));
        }
        if let Some(o) = observations.iter().find(|o| o.user != user) {
            return Err(ModelError::Config(format!(
                "observation {} belongs to user {}, not {user}",
                o.tweet_id, o.user
            )));
        }
        observations.sort_by_key(|o| (o.created_at, o.tweet_id));
        Ok(Self { user, observations })
    }

    #[inline]
    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// The user's first home-labelled observation.
    ///
    /// Users may carry several home rows; the earliest one is the home
    /// location, so the lookup is uniform regardless of how many exist.
    pub fn home(&self) -> ModelResult<&Observation> {
        self.observations
            .iter()
            .find(|o| o.label == Label::Home)
            .ok_or(ModelError::NoHome(self.user))
    }

    /// Distinct clustered regions, sorted by region id.
    ///
    /// Unclustered observations (`RegionId::UNCLUSTERED`) are not regions.
    pub fn regions(&self) -> Vec<RegionSummary> {
        let mut by_id: BTreeMap<RegionId, RegionSummary> = BTreeMap::new();
        for o in self.observations.iter().filter(|o| o.region.is_clustered()) {
            by_id
                .entry(o.region)
                .and_modify(|r| r.count += 1)
                .or_insert(RegionSummary { region: o.region, point: o.location, count: 1 });
        }
        by_id.into_values().collect()
    }

    /// Consecutive observation pairs whose region differs.
    ///
    /// These are the jumps used to fit jump-size distributions; consecutive
    /// observations in the same region would only add zero-length jumps.
    pub fn region_changes(&self) -> impl Iterator<Item = (&Observation, &Observation)> + '_ {
        self.observations
            .windows(2)
            .map(|w| (&w[0], &w[1]))
            .filter(|(a, b)| a.region != b.region)
    }
}

// ── Population ────────────────────────────────────────────────────────────────

/// All users' histories, keyed (and iterated) by ascending `UserId`.
#[derive(Clone, Debug, Default)]
pub struct Population {
    users: BTreeMap<UserId, UserHistory>,
}

impl Population {
    /// Group a flat observation table by user.
    pub fn from_observations(observations: impl IntoIterator<Item = Observation>) -> Self {
        let mut grouped: BTreeMap<UserId, Vec<Observation>> = BTreeMap::new();
        for o in observations {
            grouped.entry(o.user).or_default().push(o);
        }
        let users = grouped
            .into_iter()
            .map(|(user, mut obs)| {
                obs.sort_by_key(|o| (o.created_at, o.tweet_id));
                (user, UserHistory { user, observations: obs })
            })
            .collect();
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, user: UserId) -> Option<&UserHistory> {
        self.users.get(&user)
    }

    pub fn users(&self) -> impl Iterator<Item = UserId> + '_ {
        self.users.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserHistory> + '_ {
        self.users.values()
    }

    pub fn observation_count(&self) -> usize {
        self.users.values().map(UserHistory::len).sum()
    }

    /// Observed trajectories as region visits.
    ///
    /// `day` counts whole days since the earliest observation in the whole
    /// population and `timeslot` is the hour of day.  Visits keep their
    /// creation time so elapsed-time filters can be applied downstream.
    pub fn to_visits(&self) -> Vec<Visit> {
        let Some(first) = self
            .users
            .values()
            .filter_map(|h| h.observations.first())
            .map(|o| o.created_at)
            .min()
        else {
            return Vec::new();
        };

        self.users
            .values()
            .flat_map(|h| h.observations.iter())
            .map(|o| Visit {
                user:       o.user,
                day:        ((o.created_at - first) / SECONDS_PER_DAY) as u32,
                timeslot:   u32::from(o.hour_of_day),
                kind:       VisitKind::Region,
                location:   o.location,
                region:     o.region,
                created_at: Some(o.created_at),
            })
            .collect()
    }
}

impl FromIterator<Observation> for Population {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self::from_observations(iter)
    }
}

// ── PopulationFilter ──────────────────────────────────────────────────────────

/// Eligibility rules applied to a raw population before simulation.
///
/// Defaults: weekday observations only, a home label is required, at least
/// 20 observations and at least 2 distinct clustered regions per user.
#[derive(Clone, Debug, PartialEq)]
pub struct PopulationFilter {
    pub weekdays_only:    bool,
    pub require_home:     bool,
    pub min_observations: usize,
    pub min_regions:      usize,
}

impl Default for PopulationFilter {
    fn default() -> Self {
        Self {
            weekdays_only:    true,
            require_home:     true,
            min_observations: 20,
            min_regions:      2,
        }
    }
}

impl PopulationFilter {
    pub fn apply(&self, population: Population) -> Population {
        let before = population.len();
        let mut no_home = 0usize;
        let mut too_few = 0usize;

        let users: BTreeMap<UserId, UserHistory> = population
            .users
            .into_iter()
            .filter_map(|(user, mut history)| {
                if self.weekdays_only {
                    history.observations.retain(Observation::is_weekday);
                }
                if history.is_empty() {
                    too_few += 1;
                    return None;
                }
                if self.require_home && history.home().is_err() {
                    no_home += 1;
                    return None;
                }
                if history.len() < self.min_observations
                    || history.regions().len() < self.min_regions
                {
                    too_few += 1;
                    return None;
                }
                Some((user, history))
            })
            .collect();

        info!(
            before,
            after = users.len(),
            no_home,
            too_few,
            "population filtered"
        );
        Population { users }
    }
}
