//! Serializable sampler configuration (the run-parameter record).

use serde::{Deserialize, Serialize};

use mv_model::{DailyTrips, ModelConfig};

fn default_n_days() -> u32 {
    1
}

/// Everything needed to reproduce a sampling run.
///
/// Its JSON form is the descriptive record written next to every run's
/// output:
///
/// ```json
/// { "model": { "p": 0.6, "gamma": 0.21,
///              "region_sampling": { "name": "transitionZipf", "zipfs": 1.2, "beta": 0.03 },
///              "jump_sampling": { "name": "trueProb" },
///              "exploration": "freshRegion" },
///   "daily_trips_sampling": { "name": "static", "n": 4 },
///   "n_days": 140,
///   "seed": 42 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    pub model:       ModelConfig,
    #[serde(rename = "daily_trips_sampling", default)]
    pub daily_trips: DailyTrips,
    #[serde(default = "default_n_days")]
    pub n_days:      u32,
    #[serde(default)]
    pub seed:        u64,
}

impl SamplerConfig {
    pub fn new(model: ModelConfig) -> Self {
        Self {
            model,
            daily_trips: DailyTrips::default(),
            n_days:      default_n_days(),
            seed:        0,
        }
    }
}
