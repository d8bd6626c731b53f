//! Number of trips a simulated user makes per day.

use rand::distributions::WeightedIndex;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use mv_core::UserRng;

use crate::{ModelError, ModelResult};

/// Trip counts observed in the Swedish national travel survey.
const SURVEY_TRIPS: [u32; 21] = [
    2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 21, 22, 27,
];

/// Number of respondents reporting each entry of [`SURVEY_TRIPS`].
const SURVEY_WEIGHTS: [f64; 21] = [
    3110.0, 11266.0, 4395.0, 4878.0, 2102.0, 1401.0, 691.0, 403.0, 206.0, 131.0, 71.0, 31.0,
    28.0, 20.0, 11.0, 7.0, 2.0, 3.0, 2.0, 1.0, 1.0,
];

/// Daily trip count distribution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum DailyTrips {
    /// Every day has exactly `n` trips.
    Static { n: u32 },
    /// Gaussian, rounded, at least one trip.
    Normal { mean: f64, std: f64 },
    /// Discrete resampling of `values` with relative `weights`.
    Empirical { values: Vec<u32>, weights: Vec<f64> },
}

impl Default for DailyTrips {
    fn default() -> Self {
        DailyTrips::Static { n: 4 }
    }
}

impl DailyTrips {
    /// Empirical distribution from the national travel survey.
    pub fn national_travel_survey() -> Self {
        DailyTrips::Empirical {
            values:  SURVEY_TRIPS.to_vec(),
            weights: SURVEY_WEIGHTS.to_vec(),
        }
    }

    /// Build the ready-to-draw sampler, validating parameters.
    pub fn sampler(&self) -> ModelResult<DailyTripSampler> {
        match self {
            DailyTrips::Static { n } => Ok(DailyTripSampler::Static(*n)),
            DailyTrips::Normal { mean, std } => Normal::new(*mean, *std)
                .map(DailyTripSampler::Normal)
                .map_err(|e| ModelError::Distribution(format!("daily trips normal({mean}, {std}): {e}"))),
            DailyTrips::Empirical { values, weights } => {
                if values.len() != weights.len() {
                    return Err(ModelError::Distribution(format!(
                        "{} daily trip values but {} weights",
                        values.len(),
                        weights.len()
                    )));
                }
                let index = WeightedIndex::new(weights.iter().copied())
                    .map_err(|e| ModelError::Distribution(format!("daily trip weights: {e}")))?;
                Ok(DailyTripSampler::Empirical { values: values.clone(), index })
            }
        }
    }
}

/// Validated [`DailyTrips`], ready to draw.
#[derive(Clone, Debug)]
pub enum DailyTripSampler {
    Static(u32),
    Normal(Normal<f64>),
    Empirical {
        values: Vec<u32>,
        index:  WeightedIndex<f64>,
    },
}

impl DailyTripSampler {
    pub fn sample(&self, rng: &mut UserRng) -> u32 {
        match self {
            DailyTripSampler::Static(n) => *n,
            DailyTripSampler::Normal(dist) => {
                let x: f64 = rng.sample(dist);
                x.round().max(1.0) as u32
            }
            DailyTripSampler::Empirical { values, index } => {
                let i: usize = rng.sample(index);
                values[i]
            }
        }
    }
}
