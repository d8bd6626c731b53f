//! Jump (bearing, distance) sampling strategies.
//!
//! Both strategies bootstrap-resample the user's own inter-region jumps; they
//! differ only in whether the observed bearing is kept.

use serde::{Deserialize, Serialize};

use mv_core::UserRng;

use crate::UserHistory;

/// One displacement: initial bearing in degrees clockwise from north, and
/// great-circle distance in metres.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Jump {
    pub bearing_deg: f64,
    pub distance_m:  f64,
}

/// How exploration displacements are drawn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum JumpSampling {
    /// Empirical jump length, uniformly random bearing.
    #[default]
    TrueProb,
    /// Empirical (bearing, length) pairs resampled jointly.
    DirectionJumpTrueProb,
}

impl JumpSampling {
    /// Extract the user's jumps between consecutive observations in
    /// different regions.
    pub fn fit(self, history: &UserHistory) -> JumpSampler {
        let jumps = history
            .region_changes()
            .map(|(a, b)| Jump {
                bearing_deg: a.location.bearing_to(b.location),
                distance_m:  a.location.distance_m(b.location),
            })
            .collect();
        JumpSampler { strategy: self, jumps }
    }
}

/// Jump strategy fitted to one user.
#[derive(Clone, Debug)]
pub struct JumpSampler {
    strategy: JumpSampling,
    jumps:    Vec<Jump>,
}

impl JumpSampler {
    pub fn jumps(&self) -> &[Jump] {
        &self.jumps
    }

    pub fn is_empty(&self) -> bool {
        self.jumps.is_empty()
    }

    /// Draw one jump, or `None` if the user never changed region.
    pub fn sample(&self, rng: &mut UserRng) -> Option<Jump> {
        let jump = *rng.choose(&self.jumps)?;
        Some(match self.strategy {
            JumpSampling::DirectionJumpTrueProb => jump,
            JumpSampling::TrueProb => Jump {
                bearing_deg: rng.gen_range(0.0..360.0),
                distance_m:  jump.distance_m,
            },
        })
    }
}
