//! Zone-pair distances and their equal-population quantile grouping.
//!
//! Zone pairs are addressed by a flat index `o * n + d` (row-major), the same
//! layout the `mv-odm` matrices use, so a [`DistanceBin`]'s `pairs` can be
//! used to index any ODM built against the same [`ZoneSet`].

use crate::{SpatialError, SpatialResult, ZoneSet};

// ── ZoneDistances ─────────────────────────────────────────────────────────────

/// Dense `n × n` matrix of inter-zone distances in kilometres.
#[derive(Clone, Debug)]
pub struct ZoneDistances {
    n:  usize,
    km: Vec<f64>,
}

impl ZoneDistances {
    /// Euclidean distance between zone centroids, in kilometres.
    pub fn from_zones(zones: &ZoneSet) -> Self {
        let centroids: Vec<_> = zones.ids().map(|id| zones.centroid(id)).collect();
        let n = centroids.len();
        let mut km = Vec::with_capacity(n * n);
        for a in &centroids {
            for b in &centroids {
                km.push(a.distance(*b) / 1000.0);
            }
        }
        Self { n, km }
    }

    /// Wrap a precomputed row-major matrix.
    pub fn from_matrix(n: usize, km: Vec<f64>) -> SpatialResult<Self> {
        if km.len() != n * n {
            return Err(SpatialError::DimensionMismatch { expected: n * n, got: km.len() });
        }
        if let Some(bad) = km.iter().position(|d| !d.is_finite() || *d < 0.0) {
            return Err(SpatialError::InvalidDistance(bad));
        }
        Ok(Self { n, km })
    }

    pub fn zone_count(&self) -> usize {
        self.n
    }

    pub fn pair_count(&self) -> usize {
        self.km.len()
    }

    #[inline]
    pub fn get(&self, origin: usize, destination: usize) -> f64 {
        self.km[origin * self.n + destination]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.km
    }
}

// ── DistanceBin ───────────────────────────────────────────────────────────────

/// One distance quantile: the zone pairs whose distance lies in
/// `(lower, upper]` (the first bin also includes `lower`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceBin {
    pub lower: f64,
    pub upper: f64,
    /// Flat pair indices, ascending.
    pub pairs: Vec<usize>,
}

// ── DistanceQuantiles ─────────────────────────────────────────────────────────

/// Partition of all zone pairs into (approximately) equal-population groups
/// by distance.
///
/// Edges are the linearly interpolated `k / q` quantiles of the distance
/// values.  Repeated edges (many pairs sharing one distance, e.g. the zero
/// diagonal) collapse, so the number of bins can be smaller than `q`.
/// Computed once per zone set and shared read-only afterwards.
#[derive(Clone, Debug)]
pub struct DistanceQuantiles {
    bins:       Vec<DistanceBin>,
    pair_count: usize,
}

impl DistanceQuantiles {
    pub fn new(distances: &ZoneDistances, q: usize) -> SpatialResult<Self> {
        Self::from_values(distances.as_slice(), q)
    }

    /// Group arbitrary non-negative values; index `i` of `values` becomes
    /// pair `i`.
    pub fn from_values(values: &[f64], q: usize) -> SpatialResult<Self> {
        if q == 0 {
            return Err(SpatialError::InvalidQuantileCount(q));
        }
        if values.is_empty() {
            return Err(SpatialError::DimensionMismatch { expected: 1, got: 0 });
        }
        if let Some(bad) = values.iter().position(|d| !d.is_finite()) {
            return Err(SpatialError::InvalidDistance(bad));
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mut edges: Vec<f64> = (0..=q).map(|k| quantile(&sorted, k as f64 / q as f64)).collect();
        edges.dedup();

        let mut bins: Vec<DistanceBin> = if edges.len() == 1 {
            vec![DistanceBin { lower: edges[0], upper: edges[0], pairs: Vec::new() }]
        } else {
            edges
                .windows(2)
                .map(|w| DistanceBin { lower: w[0], upper: w[1], pairs: Vec::new() })
                .collect()
        };

        let last = bins.len() - 1;
        let upper_edges = &edges[1.min(edges.len() - 1)..];
        for (pair, &v) in values.iter().enumerate() {
            let k = upper_edges.partition_point(|e| *e < v).min(last);
            bins[k].pairs.push(pair);
        }

        Ok(Self { bins, pair_count: values.len() })
    }

    pub fn bins(&self) -> &[DistanceBin] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Number of pairs the grouping was built over.
    pub fn pair_count(&self) -> usize {
        self.pair_count
    }
}

/// Linear-interpolation quantile of an ascending slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
