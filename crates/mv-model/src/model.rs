//! The preferential-return model: one user's explore-or-return process.

use mv_core::{GeoPoint, Observation, RegionId, UserRng, VisitKind};

use crate::{Exploration, JumpSampler, ModelConfig, ModelError, ModelResult, RegionSampler, UserHistory};

// ── Step ──────────────────────────────────────────────────────────────────────

/// One position of a simulated trajectory.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Step {
    pub kind:     VisitKind,
    pub location: GeoPoint,
    pub region:   RegionId,
}

impl Step {
    /// A region step at an observation's location.
    pub fn at(observation: &Observation) -> Self {
        Self {
            kind:     VisitKind::Region,
            location: observation.location,
            region:   observation.region,
        }
    }
}

// ── PreferentialReturn ────────────────────────────────────────────────────────

/// Preferential return with exploration, fitted to one user.
///
/// At each step the user explores with probability `p · S^-gamma`, where `S`
/// is the number of distinct locations known so far; otherwise it returns to
/// a known region chosen by the region strategy.
///
/// A model value belongs to one user's simulation.  Exploration mutates `S`,
/// so it must never be shared across users.
pub struct PreferentialReturn {
    config:           ModelConfig,
    regions:          RegionSampler,
    jumps:            JumpSampler,
    s:                usize,
    exploration_prob: f64,
    next_region:      RegionId,
}

impl PreferentialReturn {
    /// Fit the region and jump strategies to `history`.
    pub fn fit(config: &ModelConfig, history: &UserHistory) -> ModelResult<Self> {
        config.validate()?;
        let regions = config.region_sampling.fit(history)?;
        let jumps = config.jump_sampling.fit(history);

        let max_region = regions
            .regions()
            .last()
            .map(|r| r.region)
            .ok_or(ModelError::NoRegions(history.user()))?;
        let s = regions.regions().len();

        Ok(Self {
            config: config.clone(),
            regions,
            jumps,
            s,
            exploration_prob: config.exploration_prob(s),
            next_region: max_region.next(),
        })
    }

    /// Number of distinct locations known to the model.
    #[inline]
    pub fn s(&self) -> usize {
        self.s
    }

    #[inline]
    pub fn exploration_prob(&self) -> f64 {
        self.exploration_prob
    }

    pub fn region_sampler(&self) -> &RegionSampler {
        &self.regions
    }

    pub fn jump_sampler(&self) -> &JumpSampler {
        &self.jumps
    }

    /// Set `S` and recompute the exploration probability.
    pub fn update_s(&mut self, s: usize) {
        self.s = s;
        self.exploration_prob = self.config.exploration_prob(s);
    }

    /// Draw the step following `prev`.
    ///
    /// Exploration needs at least one observed jump; a user who never changed
    /// region always returns.
    pub fn next(&mut self, prev: &Step, rng: &mut UserRng) -> Step {
        let r: f64 = rng.random();
        if r < self.exploration_prob {
            if let Some(jump) = self.jumps.sample(rng) {
                return self.explore(prev, jump.bearing_deg, jump.distance_m);
            }
        }

        let target = self.regions.sample(prev, rng);
        Step {
            kind:     VisitKind::Region,
            location: target.point,
            region:   target.region,
        }
    }

    fn explore(&mut self, prev: &Step, bearing_deg: f64, distance_m: f64) -> Step {
        let location = prev.location.destination(bearing_deg, distance_m);
        let region = match self.config.exploration {
            Exploration::FreshRegion => {
                let id = self.next_region;
                self.next_region = id.next();
                self.update_s(self.s + 1);
                id
            }
            Exploration::Unclustered => RegionId::UNCLUSTERED,
        };
        Step { kind: VisitKind::Point, location, region }
    }
}
