//! Dense origin-destination matrix over a zone set.

use tracing::warn;

use mv_core::ZoneId;
use mv_spatial::{ZoneDistances, ZoneSet};

use crate::{OdmError, OdmResult};

/// `n × n` trip mass, row = origin zone, column = destination zone.
///
/// Cells are addressed by `ZoneId` position in the zone set the matrix was
/// built against; the flat layout (`o * n + d`) matches
/// [`ZoneDistances`] and the pair indices of distance quantile bins.
#[derive(Clone, Debug, PartialEq)]
pub struct Odm {
    n:      usize,
    values: Vec<f64>,
}

impl Odm {
    pub fn zeros(n: usize) -> Self {
        Self { n, values: vec![0.0; n * n] }
    }

    /// Wrap a row-major matrix, validating shape and values.
    pub fn from_values(n: usize, values: Vec<f64>) -> OdmResult<Self> {
        if values.len() != n * n {
            return Err(OdmError::DimensionMismatch { expected: n * n, got: values.len() });
        }
        if let Some(bad) = values.iter().position(|v| !v.is_finite() || *v < 0.0) {
            return Err(OdmError::InvalidValue(bad));
        }
        Ok(Self { n, values })
    }

    /// Reindex a sparse `(origin label, destination label, value)` table
    /// onto the full zone cross product and normalize.
    ///
    /// Pairs naming zones outside `zones` are dropped, repeated pairs are
    /// summed, and pairs never mentioned are zero.
    pub fn from_pairs<'s>(
        zones: &ZoneSet,
        rows:  impl IntoIterator<Item = (&'s str, &'s str, f64)>,
    ) -> OdmResult<Self> {
        let mut odm = Self::zeros(zones.len());
        let mut unknown = 0usize;
        for (i, (o, d, value)) in rows.into_iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(OdmError::InvalidValue(i));
            }
            match (zones.find(o), zones.find(d)) {
                (Some(o), Some(d)) => odm.add(o, d, value),
                _ => unknown += 1,
            }
        }
        if unknown > 0 {
            warn!(unknown, "ground-truth pairs outside the zone set dropped");
        }
        odm.normalized()
    }

    #[inline]
    pub fn zone_count(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, origin: ZoneId, destination: ZoneId) -> f64 {
        self.values[origin.index() * self.n + destination.index()]
    }

    #[inline]
    pub fn add(&mut self, origin: ZoneId, destination: ZoneId, value: f64) {
        self.values[origin.index() * self.n + destination.index()] += value;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Per-origin totals (production).
    pub fn row_sums(&self) -> Vec<f64> {
        self.values.chunks(self.n.max(1)).map(|r| r.iter().sum()).collect()
    }

    /// Per-destination totals (attraction).
    pub fn col_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.n];
        for row in self.values.chunks(self.n.max(1)) {
            sums.iter_mut().zip(row).for_each(|(s, v)| *s += v);
        }
        sums
    }

    /// Non-zero cells as `(origin, destination, value)`.
    pub fn pairs(&self) -> impl Iterator<Item = (ZoneId, ZoneId, f64)> + '_ {
        let n = self.n;
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0.0)
            .map(move |(i, v)| (ZoneId((i / n) as u32), ZoneId((i % n) as u32), *v))
    }

    /// Scale to unit total.  A matrix with no mass cannot be normalized.
    pub fn normalized(mut self) -> OdmResult<Self> {
        let total = self.total();
        if total <= 0.0 {
            return Err(OdmError::Empty("total mass is zero"));
        }
        self.values.iter_mut().for_each(|v| *v /= total);
        Ok(self)
    }

    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.total() - 1.0).abs() <= tolerance
    }

    /// Zero every pair closer than `min_km` and renormalize.
    ///
    /// Used at national scale, where short trips are outside the survey's
    /// definition of travel.
    pub fn distance_cut(&self, distances: &ZoneDistances, min_km: f64) -> OdmResult<Self> {
        if distances.pair_count() != self.values.len() {
            return Err(OdmError::DimensionMismatch {
                expected: self.values.len(),
                got:      distances.pair_count(),
            });
        }
        let values = self
            .values
            .iter()
            .zip(distances.as_slice())
            .map(|(v, d)| if *d < min_km { 0.0 } else { *v })
            .collect();
        Self { n: self.n, values }.normalized()
    }
}
