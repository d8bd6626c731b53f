//! Region sampling strategies.
//!
//! A [`RegionSampling`] value is configuration; [`RegionSampling::fit`] turns
//! it into a [`RegionSampler`] bound to one user's regions.  Only fitted
//! samplers can draw, so sampling an unfitted strategy cannot be expressed.
//!
//! | Strategy         | Probability of region `j`                                   |
//! |------------------|-------------------------------------------------------------|
//! | `TrueProb`       | `count_j / Σ count`                                         |
//! | `Zipf { s }`     | `rank_j^-s`, normalised (rank 1 = most visited)             |
//! | `TransitionZipf` | row of `zipf_j · exp(-beta · d_ij)`, row-normalised         |

use rand::distributions::WeightedIndex;
use serde::{Deserialize, Serialize};

use mv_core::{GeoPoint, RegionId, UserRng};

use crate::{ModelError, ModelResult, RegionSummary, Step, UserHistory};

/// Numerical floor added before normalising so no region is ever locked out.
pub const PROBABILITY_FLOOR: f64 = 1e-7;

fn default_zipf_s() -> f64 {
    1.2
}

fn default_beta() -> f64 {
    0.03
}

// ── RegionSampling ────────────────────────────────────────────────────────────

/// How a returning user picks which known region to go back to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum RegionSampling {
    /// Proportional to observed visit frequency.
    #[default]
    TrueProb,
    /// Zipf law over the frequency rank.
    Zipf {
        #[serde(default = "default_zipf_s")]
        s: f64,
    },
    /// Distance-decayed transitions weighted by Zipf-ranked popularity.
    TransitionZipf {
        #[serde(default = "default_zipf_s")]
        zipfs: f64,
        /// Distance decay per kilometre.
        #[serde(default = "default_beta")]
        beta:  f64,
    },
}

impl RegionSampling {
    pub fn zipf() -> Self {
        RegionSampling::Zipf { s: default_zipf_s() }
    }

    pub fn transition_zipf() -> Self {
        RegionSampling::TransitionZipf { zipfs: default_zipf_s(), beta: default_beta() }
    }

    pub(crate) fn validate(&self) -> ModelResult<()> {
        let ok = match *self {
            RegionSampling::TrueProb => true,
            RegionSampling::Zipf { s } => s.is_finite(),
            RegionSampling::TransitionZipf { zipfs, beta } => zipfs.is_finite() && beta.is_finite() && beta >= 0.0,
        };
        if ok {
            Ok(())
        } else {
            Err(ModelError::Config(format!("invalid region sampling parameters {self:?}")))
        }
    }

    /// Fit this strategy to one user's history.
    pub fn fit(&self, history: &UserHistory) -> ModelResult<RegionSampler> {
        self.validate()?;
        let regions = history.regions();
        if regions.is_empty() {
            return Err(ModelError::NoRegions(history.user()));
        }

        let fitted = match *self {
            RegionSampling::TrueProb => {
                let total: usize = regions.iter().map(|r| r.count).sum();
                let probs = regions.iter().map(|r| r.count as f64 / total as f64).collect();
                Fitted::global(probs)?
            }
            RegionSampling::Zipf { s } => Fitted::global(zipf_probabilities(&regions, s))?,
            RegionSampling::TransitionZipf { zipfs, beta } => {
                let probs = normalized(
                    zipf_probabilities(&regions, zipfs).into_iter().map(|p| p + PROBABILITY_FLOOR).collect(),
                );
                Fitted::transition(&regions, probs, beta)?
            }
        };

        Ok(RegionSampler { regions, fitted })
    }
}

/// `rank^-s` over regions ranked by count (descending, ties by region id),
/// normalised, in `regions` order.
fn zipf_probabilities(regions: &[RegionSummary], s: f64) -> Vec<f64> {
    let mut order: Vec<usize> = (0..regions.len()).collect();
    order.sort_by(|&a, &b| {
        regions[b].count.cmp(&regions[a].count).then(regions[a].region.cmp(&regions[b].region))
    });

    let mut probs = vec![0.0; regions.len()];
    for (rank0, &idx) in order.iter().enumerate() {
        probs[idx] = ((rank0 + 1) as f64).powf(-s);
    }
    normalized(probs)
}

fn normalized(mut v: Vec<f64>) -> Vec<f64> {
    let total: f64 = v.iter().sum();
    if total > 0.0 {
        v.iter_mut().for_each(|x| *x /= total);
    }
    v
}

fn weighted(weights: &[f64]) -> ModelResult<WeightedIndex<f64>> {
    WeightedIndex::new(weights.iter().copied()).map_err(|e| ModelError::Distribution(e.to_string()))
}

// ── Fitted state ──────────────────────────────────────────────────────────────

enum Fitted {
    /// Same distribution regardless of the previous step.
    Global {
        probs: Vec<f64>,
        index: WeightedIndex<f64>,
    },
    /// Row-stochastic transitions between known regions.
    Transition {
        probs:  Vec<f64>,
        beta:   f64,
        matrix: Vec<f64>,
        rows:   Vec<WeightedIndex<f64>>,
        global: WeightedIndex<f64>,
    },
}

impl Fitted {
    fn global(probs: Vec<f64>) -> ModelResult<Self> {
        let index = weighted(&probs)?;
        Ok(Fitted::Global { probs, index })
    }

    fn transition(regions: &[RegionSummary], probs: Vec<f64>, beta: f64) -> ModelResult<Self> {
        let n = regions.len();
        let mut matrix = vec![0.0; n * n];

        for (i, from) in regions.iter().enumerate() {
            let row = &mut matrix[i * n..(i + 1) * n];

            // Distance-decay seed, floored and row-normalised.
            for (j, to) in regions.iter().enumerate() {
                row[j] = (-beta * from.point.distance_km(to.point)).exp() + PROBABILITY_FLOOR;
            }
            let seed_total: f64 = row.iter().sum();

            // Weight by popularity and renormalise.
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = probs[j] * (*cell / seed_total);
            }
            let total: f64 = row.iter().sum();
            row.iter_mut().for_each(|c| *c /= total);
        }

        let rows = matrix.chunks(n).map(weighted).collect::<ModelResult<Vec<_>>>()?;
        let global = weighted(&probs)?;
        Ok(Fitted::Transition { probs, beta, matrix, rows, global })
    }
}

// ── RegionSampler ─────────────────────────────────────────────────────────────

/// A region strategy fitted to one user's regions.
///
/// Owned by exactly one user's model; never shared across users.
pub struct RegionSampler {
    regions: Vec<RegionSummary>,
    fitted:  Fitted,
}

impl RegionSampler {
    /// The user's regions, sorted by id.
    pub fn regions(&self) -> &[RegionSummary] {
        &self.regions
    }

    /// Global (previous-step independent) region probabilities, in
    /// [`regions`][Self::regions] order.
    pub fn probabilities(&self) -> &[f64] {
        match &self.fitted {
            Fitted::Global { probs, .. } | Fitted::Transition { probs, .. } => probs,
        }
    }

    /// Row-major region × region transition matrix, for `TransitionZipf`.
    pub fn transition_matrix(&self) -> Option<&[f64]> {
        match &self.fitted {
            Fitted::Global { .. } => None,
            Fitted::Transition { matrix, .. } => Some(matrix),
        }
    }

    /// Representative location of a known region.
    pub fn point(&self, region: RegionId) -> Option<GeoPoint> {
        self.position(region).map(|i| self.regions[i].point)
    }

    fn position(&self, region: RegionId) -> Option<usize> {
        self.regions.binary_search_by_key(&region, |r| r.region).ok()
    }

    /// Draw the region to return to after `prev`.
    ///
    /// For transition sampling, a `prev` in a known region uses that
    /// region's row.  Otherwise (`prev` was an exploration point) the
    /// weights are recomputed from `prev`'s coordinates.
    pub fn sample(&self, prev: &Step, rng: &mut UserRng) -> RegionSummary {
        let idx: usize = match &self.fitted {
            Fitted::Global { index, .. } => rng.sample(index),
            Fitted::Transition { rows, probs, beta, global, .. } => match self.position(prev.region) {
                Some(row) => rng.sample(&rows[row]),
                None => self.sample_from_point(prev.location, probs, *beta, global, rng),
            },
        };
        self.regions[idx]
    }

    /// Distance-decayed draw from an arbitrary location.
    ///
    /// Regions at distance zero are excluded; if none remain the global
    /// probabilities are used instead.
    fn sample_from_point(
        &self,
        from:   GeoPoint,
        probs:  &[f64],
        beta:   f64,
        global: &WeightedIndex<f64>,
        rng:    &mut UserRng,
    ) -> usize {
        let weights: Vec<f64> = self
            .regions
            .iter()
            .zip(probs)
            .map(|(r, p)| {
                let d = from.distance_km(r.point);
                if d > 0.0 { p * (-beta * d).exp() + PROBABILITY_FLOOR } else { 0.0 }
            })
            .collect();

        match weighted(&weights) {
            Ok(index) => rng.sample(&index),
            Err(_) => rng.sample(global),
        }
    }
}
