//! Gravity model: distance-decay seed balanced to observed margins by
//! iterative proportional fitting.

use tracing::{debug, warn};

use mv_spatial::ZoneDistances;

use crate::{Odm, OdmError, OdmResult};

/// Floor added to production and attraction margins so no zone is empty.
pub const MARGIN_FLOOR: f64 = 1e-7;

/// Doubly-constrained gravity model.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GravityModel {
    /// Distance decay per kilometre.
    pub beta:      f64,
    pub max_iter:  usize,
    /// Largest cell change (between checks) accepted as converged.
    pub tolerance: f64,
}

impl Default for GravityModel {
    fn default() -> Self {
        Self { beta: 0.03, max_iter: 5000, tolerance: 1e-8 }
    }
}

impl GravityModel {
    /// Normalized `exp(-beta · d)` over all zone pairs.
    pub fn seed(&self, distances: &ZoneDistances) -> OdmResult<Odm> {
        let values = distances.as_slice().iter().map(|d| (-self.beta * d).exp()).collect();
        Odm::from_values(distances.zone_count(), values)?.normalized()
    }

    /// Fill a sparse ODM: balance the distance seed to the sparse matrix's
    /// row (production) and column (attraction) totals.
    ///
    /// Non-convergence is logged and the last iterate is still returned.
    pub fn gravitate(&self, sparse: &Odm, distances: &ZoneDistances) -> OdmResult<Odm> {
        if sparse.zone_count() != distances.zone_count() {
            return Err(OdmError::DimensionMismatch {
                expected: distances.pair_count(),
                got:      sparse.as_slice().len(),
            });
        }
        let seed = self.seed(distances)?;

        let production: Vec<f64> = sparse.row_sums().into_iter().map(|v| v + MARGIN_FLOOR).collect();
        let mut attraction: Vec<f64> = sparse.col_sums().into_iter().map(|v| v + MARGIN_FLOOR).collect();
        let scale = production.iter().sum::<f64>() / attraction.iter().sum::<f64>();
        attraction.iter_mut().for_each(|a| *a *= scale);

        let outcome = ipf(seed.as_slice(), &production, &attraction, self.max_iter, self.tolerance)?;
        Odm::from_values(sparse.zone_count(), outcome.matrix)?.normalized()
    }
}

// ── IPF ───────────────────────────────────────────────────────────────────────

/// Result of [`ipf`].
#[derive(Clone, Debug)]
pub struct IpfOutcome {
    /// Row-major balanced matrix.
    pub matrix:     Vec<f64>,
    pub iterations: usize,
    pub converged:  bool,
    /// Largest cell change at the last convergence check.
    pub max_change: f64,
}

/// Iterative proportional fitting of a square `seed` to row totals
/// `production` and column totals `attraction`.
///
/// Each iteration rescales every row to its production total, then every
/// column to its attraction total.  Convergence is checked every 10th
/// iteration as the largest absolute cell change over that iteration.
/// Rows or columns whose seed is all zero stay zero.
pub fn ipf(
    seed:       &[f64],
    production: &[f64],
    attraction: &[f64],
    max_iter:   usize,
    tolerance:  f64,
) -> OdmResult<IpfOutcome> {
    let n = production.len();
    if n == 0 {
        return Err(OdmError::Empty("no zones to balance"));
    }
    if attraction.len() != n {
        return Err(OdmError::DimensionMismatch { expected: n, got: attraction.len() });
    }
    if seed.len() != n * n {
        return Err(OdmError::DimensionMismatch { expected: n * n, got: seed.len() });
    }
    if let Some(bad) = seed.iter().chain(production).chain(attraction).position(|v| !v.is_finite() || *v < 0.0) {
        return Err(OdmError::InvalidValue(bad));
    }
    if tolerance.is_nan() || tolerance <= 0.0 {
        return Err(OdmError::Config(format!("tolerance must be positive, got {tolerance}")));
    }

    let mut m = seed.to_vec();
    let mut col_sums = vec![0.0; n];
    let mut max_change = f64::INFINITY;
    let mut iterations = 0;
    let mut converged = false;

    for i in 0..max_iter {
        iterations = i + 1;
        let previous = (i % 10 == 0).then(|| m.clone());

        for (row, &target) in m.chunks_mut(n).zip(production) {
            let sum: f64 = row.iter().sum();
            if sum > 0.0 {
                let f = target / sum;
                row.iter_mut().for_each(|c| *c *= f);
            }
        }

        col_sums.iter_mut().for_each(|s| *s = 0.0);
        for row in m.chunks(n) {
            col_sums.iter_mut().zip(row).for_each(|(s, c)| *s += c);
        }
        for row in m.chunks_mut(n) {
            for ((c, &sum), &target) in row.iter_mut().zip(&col_sums).zip(attraction) {
                if sum > 0.0 {
                    *c *= target / sum;
                }
            }
        }

        if let Some(previous) = previous {
            max_change = m
                .iter()
                .zip(&previous)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max);
            if max_change < tolerance {
                converged = true;
                break;
            }
        }
    }

    if converged {
        debug!(iterations, max_change, "IPF converged");
    } else {
        warn!(iterations, max_change, tolerance, "IPF did not converge; returning last iterate");
    }
    Ok(IpfOutcome { matrix: m, iterations, converged, max_change })
}
