//! Kullback-Leibler divergence over distance bins, with zero-bin merging.

use tracing::debug;

use crate::{MetricsTable, ValidateError, ValidateResult};

/// Returned when the model series still holds an empty bin after merging,
/// so the divergence is undefined.  No finite KL value reaches it in
/// practice.
pub const KL_UNDEFINED: f64 = 999.0;

/// `KL(ground truth ‖ model)` between two titled columns of a metrics table.
pub fn kullback_leibler(table: &MetricsTable, ground_truth: &str, model: &str) -> ValidateResult<f64> {
    let gt = table.sums(ground_truth)?;
    let m = table.sums(model)?;
    kl_divergence(&gt, &m)
}

/// `Σ gt_i · log10(gt_i / model_i)` after [`merge_zero_bins`].
///
/// Returns [`KL_UNDEFINED`] if the model still has an empty bin once merging
/// stops.  Terms with `gt_i == 0` contribute nothing.
pub fn kl_divergence(ground_truth: &[f64], model: &[f64]) -> ValidateResult<f64> {
    let (gt, m) = merge_zero_bins(ground_truth, model)?;

    if m.contains(&0.0) {
        debug!(bins = m.len(), "model series empty after merging");
        return Ok(KL_UNDEFINED);
    }
    Ok(gt
        .iter()
        .zip(&m)
        .filter(|(g, _)| **g > 0.0)
        .map(|(g, m)| g * (g / m).log10())
        .sum())
}

/// Remove zeros from two aligned bin series.
///
/// 1. Bins that are zero in both series are dropped.
/// 2. While more than one bin is left, the first bin that is zero in either
///    series is folded into the next bin, or into the previous one when it
///    is the last bin.
///
/// Bin order is preserved.  The result is zero-free unless a single bin
/// remains.
pub fn merge_zero_bins(ground_truth: &[f64], model: &[f64]) -> ValidateResult<(Vec<f64>, Vec<f64>)> {
    if ground_truth.len() != model.len() {
        return Err(ValidateError::LengthMismatch {
            what:     "model bins",
            expected: ground_truth.len(),
            got:      model.len(),
        });
    }
    check_values("ground truth", ground_truth)?;
    check_values("model", model)?;

    let (mut gt, mut m): (Vec<f64>, Vec<f64>) = ground_truth
        .iter()
        .zip(model)
        .filter(|(g, m)| **g != 0.0 || **m != 0.0)
        .unzip();
    if gt.is_empty() {
        return Err(ValidateError::AllZero);
    }

    while gt.len() > 1 {
        let Some(i) = gt.iter().zip(&m).position(|(g, m)| *g == 0.0 || *m == 0.0) else {
            break;
        };
        let into = if i + 1 < gt.len() { i + 1 } else { i - 1 };
        gt[into] += gt[i];
        m[into] += m[i];
        gt.remove(i);
        m.remove(i);
    }
    Ok((gt, m))
}

fn check_values(series: &'static str, values: &[f64]) -> ValidateResult<()> {
    match values.iter().position(|v| !v.is_finite() || *v < 0.0) {
        Some(index) => Err(ValidateError::InvalidValue { series, index }),
        None => Ok(()),
    }
}
