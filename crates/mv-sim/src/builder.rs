//! Fluent builder for constructing a [`Sampler`].

use mv_model::{DailyTrips, ModelConfig};

use crate::{Sampler, SamplerConfig, SimError, SimResult};

/// Fluent builder for [`Sampler`].
///
/// # Required inputs
///
/// - [`ModelConfig`] — `p`, `gamma`, region/jump strategies
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                    |
/// |---------------------|----------------------------|
/// | `.daily_trips(d)`   | `DailyTrips::Static { 4 }` |
/// | `.n_days(n)`        | `1`                        |
/// | `.seed(s)`          | `0`                        |
///
/// # Example
///
/// ```rust,ignore
/// let sampler = SamplerBuilder::new(model)
///     .daily_trips(DailyTrips::national_travel_survey())
///     .n_days(7 * 20)
///     .seed(42)
///     .build()?;
/// let visits = sampler.sample(&population)?;
/// ```
pub struct SamplerBuilder {
    config: SamplerConfig,
}

impl SamplerBuilder {
    pub fn new(model: ModelConfig) -> Self {
        Self { config: SamplerConfig::new(model) }
    }

    /// Start from a (typically deserialised) configuration record.
    pub fn from_config(config: SamplerConfig) -> Self {
        Self { config }
    }

    pub fn daily_trips(mut self, daily_trips: DailyTrips) -> Self {
        self.config.daily_trips = daily_trips;
        self
    }

    pub fn n_days(mut self, n_days: u32) -> Self {
        self.config.n_days = n_days;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Validate the configuration and return a ready-to-run [`Sampler`].
    pub fn build(self) -> SimResult<Sampler> {
        if self.config.n_days == 0 {
            return Err(SimError::Config("n_days must be at least 1".into()));
        }
        self.config.model.validate()?;
        let daily = self.config.daily_trips.sampler()?;
        Ok(Sampler { config: self.config, daily })
    }
}
