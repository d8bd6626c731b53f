//! Spatial structural similarity (SpSSIM) per distance quantile.
//!
//! For every bin, both matrices are masked to the bin's zone pairs (cells
//! outside the bin count as zero) and compared with the SSIM formula
//!
//! ```text
//! score = (2·μx·μy + C1) (2·σxy + C2) / ((μx² + μy² + C1) (σx² + σy² + C2))
//! ```
//!
//! where means and variances are taken over all `n²` cells (population
//! variance), the covariance uses `n² − 1`, and the stabilizers come from the
//! model matrix: `C1 = mean(Y)² · 1e-4`, `C2 = var(Y) · 1e-2` (sample
//! variance).

use mv_odm::Odm;
use mv_spatial::DistanceQuantiles;

use crate::{ValidateError, ValidateResult};

/// Quantile count used for SpSSIM when the caller has no preference.
pub const DEFAULT_SPSSIM_QUANTILES: usize = 20;

/// Allowed deviation of either input's total from 1.
const NORMALIZATION_TOLERANCE: f64 = 1e-5;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpssimBin {
    pub lower:      f64,
    pub upper:      f64,
    pub score:      f64,
    /// Demand share of the bin in each matrix.
    pub x_weight:   f64,
    pub y_weight:   f64,
    pub x_mean:     f64,
    pub y_mean:     f64,
    pub x_variance: f64,
    pub y_variance: f64,
    pub covariance: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpssimReport {
    pub bins:           Vec<SpssimBin>,
    /// Unweighted mean of the bin scores.
    pub mean_score:     f64,
    /// Bin scores weighted by the ground truth's demand share.
    pub weighted_score: f64,
}

/// SpSSIM of ground truth `x` against model `y`.
///
/// Both matrices must cover `quantiles`' zone pairs and be normalized.
pub fn spssim(x: &Odm, y: &Odm, quantiles: &DistanceQuantiles) -> ValidateResult<SpssimReport> {
    let (xs, ys) = (x.as_slice(), y.as_slice());
    let n = quantiles.pair_count();
    for got in [xs.len(), ys.len()] {
        if got != n {
            return Err(ValidateError::LengthMismatch { what: "ODM cells", expected: n, got });
        }
    }
    if n < 2 {
        return Err(ValidateError::Degenerate("SpSSIM needs at least two zone pairs"));
    }
    for (series, odm) in [("ground truth", x), ("model", y)] {
        let total = odm.total();
        if (total - 1.0).abs() > NORMALIZATION_TOLERANCE {
            return Err(ValidateError::NotNormalized { series, total });
        }
    }

    let nf = n as f64;
    let y_mean = ys.iter().sum::<f64>() / nf;
    let y_var = ys.iter().map(|v| (v - y_mean).powi(2)).sum::<f64>() / (nf - 1.0);
    if y_var == 0.0 {
        return Err(ValidateError::Degenerate("model matrix is constant"));
    }
    let c1 = y_mean.powi(2) * 1e-4;
    let c2 = y_var * 1e-2;

    let bins: Vec<SpssimBin> = quantiles
        .bins()
        .iter()
        .map(|bin| {
            let k = bin.pairs.len() as f64;
            let x_weight: f64 = bin.pairs.iter().map(|&p| xs[p]).sum();
            let y_weight: f64 = bin.pairs.iter().map(|&p| ys[p]).sum();
            let (mx, my) = (x_weight / nf, y_weight / nf);

            // Cells outside the bin are zero, so they contribute mean² to each
            // variance and mx·my to the covariance.
            let outside = nf - k;
            let (mut sxx, mut syy, mut sxy) = (outside * mx * mx, outside * my * my, outside * mx * my);
            for &p in &bin.pairs {
                let (dx, dy) = (xs[p] - mx, ys[p] - my);
                sxx += dx * dx;
                syy += dy * dy;
                sxy += dx * dy;
            }
            let (vx, vy, cov) = (sxx / nf, syy / nf, sxy / (nf - 1.0));

            let score = ((2.0 * mx * my + c1) * (2.0 * cov + c2)) / ((mx * mx + my * my + c1) * (vx + vy + c2));
            SpssimBin {
                lower: bin.lower,
                upper: bin.upper,
                score,
                x_weight,
                y_weight,
                x_mean: mx,
                y_mean: my,
                x_variance: vx,
                y_variance: vy,
                covariance: cov,
            }
        })
        .collect();

    let mean_score = bins.iter().map(|b| b.score).sum::<f64>() / bins.len() as f64;
    let weighted_score = bins.iter().map(|b| b.score * b.x_weight).sum();
    Ok(SpssimReport { bins, mean_score, weighted_score })
}
