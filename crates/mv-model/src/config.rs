//! Model configuration and its builder.

use serde::{Deserialize, Serialize};

use crate::{JumpSampling, ModelError, ModelResult, RegionSampling};

/// What an exploration step does to the user's set of known locations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Exploration {
    /// Each explored point gets a fresh region id (`max + 1`) and `S` grows,
    /// so exploration suppresses itself over time.
    #[default]
    FreshRegion,
    /// Explored points carry `RegionId::UNCLUSTERED` and `S` never changes.
    Unclustered,
}

/// Parameters of the preferential-return model.
///
/// Construct with [`ModelConfigBuilder`]; deserialised values should be
/// checked with [`validate`][Self::validate].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Exploration weight, in `[0, 1]`.
    pub p:               f64,
    /// Exploration decay exponent.
    pub gamma:           f64,
    #[serde(default)]
    pub region_sampling: RegionSampling,
    #[serde(default)]
    pub jump_sampling:   JumpSampling,
    #[serde(default)]
    pub exploration:     Exploration,
}

impl ModelConfig {
    pub fn validate(&self) -> ModelResult<()> {
        if !self.p.is_finite() || !(0.0..=1.0).contains(&self.p) {
            return Err(ModelError::Config(format!("p must be in [0, 1], got {}", self.p)));
        }
        if !self.gamma.is_finite() {
            return Err(ModelError::Config(format!("gamma must be finite, got {}", self.gamma)));
        }
        self.region_sampling.validate()
    }

    /// `p · S^-gamma`.
    #[inline]
    pub fn exploration_prob(&self, s: usize) -> f64 {
        self.p * (s as f64).powf(-self.gamma)
    }
}

/// Fluent builder for [`ModelConfig`].
///
/// `p` and `gamma` are required; strategies default to `TrueProb` and
/// exploration to [`Exploration::FreshRegion`].
#[derive(Default)]
pub struct ModelConfigBuilder {
    p:               Option<f64>,
    gamma:           Option<f64>,
    region_sampling: RegionSampling,
    jump_sampling:   JumpSampling,
    exploration:     Exploration,
}

impl ModelConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn p(mut self, p: f64) -> Self {
        self.p = Some(p);
        self
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }

    pub fn region_sampling(mut self, strategy: RegionSampling) -> Self {
        self.region_sampling = strategy;
        self
    }

    pub fn jump_sampling(mut self, strategy: JumpSampling) -> Self {
        self.jump_sampling = strategy;
        self
    }

    pub fn exploration(mut self, exploration: Exploration) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn build(self) -> ModelResult<ModelConfig> {
        let p = self.p.ok_or_else(|| ModelError::Config("p is required".into()))?;
        let gamma = self.gamma.ok_or_else(|| ModelError::Config("gamma is required".into()))?;
        let config = ModelConfig {
            p,
            gamma,
            region_sampling: self.region_sampling,
            jump_sampling:   self.jump_sampling,
            exploration:     self.exploration,
        };
        config.validate()?;
        Ok(config)
    }
}
