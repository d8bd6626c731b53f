//! Unit tests for mv-validate.
//!
//! Most fixtures use two zones, so an ODM has four cells
//! `[(1,1), (1,2), (2,1), (2,2)]` and the intra-zone pairs sit at distance 0.

use mv_odm::Odm;
use mv_spatial::DistanceQuantiles;

// ── Helpers ───────────────────────────────────────────────────────────────────

const EPS: f64 = 1e-12;

fn odm(values: [f64; 4]) -> Odm {
    Odm::from_values(2, values.to_vec()).unwrap()
}

/// Two bins: `{(1,1), (2,2)}` at 0 km and `{(1,2), (2,1)}` at 1 km.
fn two_bins() -> DistanceQuantiles {
    let q = DistanceQuantiles::from_values(&[0.0, 1.0, 1.0, 0.0], 2).unwrap();
    assert_eq!(q.len(), 2);
    q
}

fn one_bin() -> DistanceQuantiles {
    DistanceQuantiles::from_values(&[0.0, 1.0, 1.0, 0.0], 1).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── DistanceMetrics ───────────────────────────────────────────────────────────

#[cfg(test)]
mod metrics_tests {
    use super::*;
    use crate::{DistanceMetrics, ValidateError};

    #[test]
    fn per_bin_statistics() {
        let gt = odm([0.5, 0.5, 0.0, 0.0]);
        let model = odm([0.25, 0.25, 0.25, 0.25]);
        let table = DistanceMetrics::compute(&two_bins(), &[&gt, &model], &["gt", "model"]).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.titles(), ["gt", "model"]);
        assert_eq!(table.bins()[0].pair_count, 2);
        assert_eq!(table.bins()[1].upper, 1.0);

        assert_eq!(table.sums("gt").unwrap(), vec![0.5, 0.5]);
        assert_eq!(table.sums("model").unwrap(), vec![0.5, 0.5]);
        assert_eq!(table.column("gt_mean").unwrap(), vec![0.25, 0.25]);
        assert_eq!(table.column("gt_variance").unwrap(), vec![0.0625, 0.0625]);
        assert_eq!(table.column("model_variance").unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn column_names_follow_titles() {
        let a = odm([1.0, 0.0, 0.0, 0.0]);
        let table = DistanceMetrics::compute(&one_bin(), &[&a], &["truth"]).unwrap();
        assert_eq!(
            table.column_names(),
            ["lower", "upper", "pair_count", "truth_sum", "truth_mean", "truth_variance"]
        );
    }

    #[test]
    fn unknown_columns_rejected() {
        let a = odm([1.0, 0.0, 0.0, 0.0]);
        let table = DistanceMetrics::compute(&one_bin(), &[&a], &["truth"]).unwrap();
        assert!(matches!(table.sums("model"), Err(ValidateError::UnknownTitle(t)) if t == "model"));
        assert!(table.column("truth_median").is_err());
        assert!(table.column("truth").is_err());
    }

    #[test]
    fn titles_must_match_odms() {
        let a = odm([1.0, 0.0, 0.0, 0.0]);
        assert!(matches!(
            DistanceMetrics::compute(&one_bin(), &[&a], &["a", "b"]),
            Err(ValidateError::LengthMismatch { expected: 1, got: 2, .. })
        ));
        assert!(matches!(
            DistanceMetrics::compute(&one_bin(), &[&a, &a], &["a", "a"]),
            Err(ValidateError::DuplicateTitle(_))
        ));
    }

    #[test]
    fn odm_must_cover_every_pair() {
        let small = Odm::from_values(1, vec![1.0]).unwrap();
        assert!(matches!(
            DistanceMetrics::compute(&one_bin(), &[&small], &["a"]),
            Err(ValidateError::LengthMismatch { expected: 4, got: 1, .. })
        ));
    }
}

// ── Kullback-Leibler ──────────────────────────────────────────────────────────

#[cfg(test)]
mod kl_tests {
    use super::*;
    use crate::{kl_divergence, kullback_leibler, merge_zero_bins, DistanceMetrics, ValidateError, KL_UNDEFINED};

    #[test]
    fn identical_odms_score_zero() {
        let gt = odm([0.5, 0.5, 0.0, 0.0]);
        let model = gt.clone();
        let table = DistanceMetrics::compute(&two_bins(), &[&gt, &model], &["gt", "model"]).unwrap();
        assert_eq!(kullback_leibler(&table, "gt", "model").unwrap(), 0.0);
    }

    #[test]
    fn identical_series_score_zero() {
        let x = [0.1, 0.2, 0.3, 0.4];
        assert!(kl_divergence(&x, &x).unwrap().abs() < EPS);
    }

    #[test]
    fn log10_divergence() {
        let kl = kl_divergence(&[0.5, 0.5], &[0.25, 0.75]).unwrap();
        let expected = 0.5 * 2.0f64.log10() + 0.5 * (2.0f64 / 3.0).log10();
        assert!(close(kl, expected), "{kl} vs {expected}");
    }

    #[test]
    fn empty_model_is_undefined() {
        assert_eq!(kl_divergence(&[1.0], &[0.0]).unwrap(), KL_UNDEFINED);
        assert_eq!(kl_divergence(&[0.5, 0.5], &[0.0, 0.0]).unwrap(), KL_UNDEFINED);

        let gt = odm([0.5, 0.5, 0.0, 0.0]);
        let model = odm([0.0; 4]);
        let table = DistanceMetrics::compute(&two_bins(), &[&gt, &model], &["gt", "model"]).unwrap();
        assert_eq!(kullback_leibler(&table, "gt", "model").unwrap(), KL_UNDEFINED);
    }

    #[test]
    fn disjoint_support_merges_to_one_bin() {
        // Zero in either series folds into the next bin.
        let (gt, m) = merge_zero_bins(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert_eq!((gt, m), (vec![1.0], vec![1.0]));
        assert_eq!(kl_divergence(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn zero_bin_merges_into_next() {
        let (gt, m) = merge_zero_bins(&[0.2, 0.0, 0.3, 0.5], &[0.1, 0.4, 0.0, 0.5]).unwrap();
        assert_eq!(gt, vec![0.2, 0.3, 0.5]);
        assert_eq!(m, vec![0.1, 0.4, 0.5]);
    }

    #[test]
    fn last_zero_bin_merges_into_previous() {
        let (gt, m) = merge_zero_bins(&[0.5, 0.5], &[0.5, 0.0]).unwrap();
        assert_eq!((gt, m), (vec![1.0], vec![0.5]));
    }

    #[test]
    fn trailing_zero_run_keeps_merging() {
        // [a, b+c] / [1, 0] still holds a zero, so the last bin folds back.
        let (gt, m) = merge_zero_bins(&[0.2, 0.3, 0.5], &[1.0, 0.0, 0.0]).unwrap();
        assert_eq!(m, vec![1.0]);
        assert!(close(gt[0], 1.0));
        let kl = kl_divergence(&[0.2, 0.3, 0.5], &[1.0, 0.0, 0.0]).unwrap();
        assert!(kl.abs() < 1e-12, "kl = {kl}");
    }

    #[test]
    fn shared_zeros_dropped_first() {
        let (gt, m) = merge_zero_bins(&[0.5, 0.0, 0.5], &[0.4, 0.0, 0.6]).unwrap();
        assert_eq!((gt, m), (vec![0.5, 0.5], vec![0.4, 0.6]));
    }

    #[test]
    fn merging_always_terminates_zero_free() {
        // Every zero/non-zero pattern over six bins in both series.
        for mask in 0u32..(1 << 12) {
            let gt: Vec<f64> = (0..6).map(|i| if mask >> i & 1 == 1 { (i + 1) as f64 } else { 0.0 }).collect();
            let m: Vec<f64> = (0..6).map(|i| if mask >> (i + 6) & 1 == 1 { (6 - i) as f64 } else { 0.0 }).collect();
            match merge_zero_bins(&gt, &m) {
                Ok((g, m)) => {
                    assert!(!g.is_empty());
                    assert_eq!(g.len(), m.len());
                    let zero_free = g.iter().chain(&m).all(|v| *v > 0.0);
                    assert!(zero_free || g.len() == 1, "mask {mask:#x}: {g:?} {m:?}");
                }
                Err(ValidateError::AllZero) => assert_eq!(mask, 0),
                Err(e) => panic!("mask {mask:#x}: {e}"),
            }
        }
    }

    #[test]
    fn invalid_series_rejected() {
        assert!(matches!(kl_divergence(&[1.0], &[0.5, 0.5]), Err(ValidateError::LengthMismatch { .. })));
        assert!(matches!(
            kl_divergence(&[1.0, f64::NAN], &[0.5, 0.5]),
            Err(ValidateError::InvalidValue { series: "ground truth", index: 1 })
        ));
        assert!(matches!(
            kl_divergence(&[1.0, 0.0], &[-0.5, 0.5]),
            Err(ValidateError::InvalidValue { series: "model", index: 0 })
        ));
        assert!(matches!(kl_divergence(&[0.0, 0.0], &[0.0, 0.0]), Err(ValidateError::AllZero)));
    }
}

// ── SpSSIM ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod spssim_tests {
    use super::*;
    use crate::{spssim, ValidateError};

    #[test]
    fn single_bin_identical() {
        let x = odm([0.1, 0.2, 0.3, 0.4]);
        let report = spssim(&x, &x, &one_bin()).unwrap();
        assert_eq!(report.bins.len(), 1);

        // Population variance 0.0125, sample variance 0.05 / 3.
        let (var, sample_var) = (0.0125, 0.05 / 3.0);
        let c2 = sample_var * 1e-2;
        let expected = (2.0 * sample_var + c2) / (2.0 * var + c2);

        let bin = &report.bins[0];
        assert!(close(bin.x_weight, 1.0));
        assert!(close(bin.x_mean, 0.25));
        assert!(close(bin.x_variance, var));
        assert!(close(bin.covariance, sample_var));
        assert!(close(bin.score, expected), "{} vs {expected}", bin.score);
        assert!(close(report.mean_score, expected));
        assert!(close(report.weighted_score, expected));
    }

    #[test]
    fn masked_bins_share_luminance() {
        let x = odm([0.1, 0.2, 0.3, 0.4]);
        let report = spssim(&x, &x, &two_bins()).unwrap();
        assert_eq!(report.bins.len(), 2);
        for bin in &report.bins {
            assert_eq!(bin.x_mean, bin.y_mean);
            assert_eq!(bin.x_variance, bin.y_variance);
            assert!(close(bin.covariance, bin.x_variance * 4.0 / 3.0));
        }
        // Zero-distance bin holds (1,1) and (2,2).
        assert!(close(report.bins[0].x_weight, 0.5));
        assert!(close(report.bins[0].x_mean, 0.5 / 4.0));
        let weighted: f64 = report.bins.iter().map(|b| b.score * b.x_weight).sum();
        assert!(close(report.weighted_score, weighted));
    }

    #[test]
    fn mismatch_scores_lower() {
        let x = odm([0.1, 0.2, 0.3, 0.4]);
        let y = odm([0.4, 0.3, 0.2, 0.1]);
        let same = spssim(&x, &x, &one_bin()).unwrap();
        let reversed = spssim(&x, &y, &one_bin()).unwrap();
        assert!(reversed.bins[0].covariance < 0.0);
        assert!(reversed.mean_score < same.mean_score);
    }

    #[test]
    fn inputs_must_be_normalized() {
        let x = odm([0.1, 0.2, 0.3, 0.4]);
        let heavy = odm([1.0, 2.0, 3.0, 4.0]);
        assert!(matches!(
            spssim(&x, &heavy, &one_bin()),
            Err(ValidateError::NotNormalized { series: "model", .. })
        ));
        assert!(matches!(
            spssim(&heavy, &x, &one_bin()),
            Err(ValidateError::NotNormalized { series: "ground truth", .. })
        ));
    }

    #[test]
    fn constant_model_rejected() {
        let x = odm([0.1, 0.2, 0.3, 0.4]);
        let flat = odm([0.25; 4]);
        assert!(matches!(spssim(&x, &flat, &one_bin()), Err(ValidateError::Degenerate(_))));
    }

    #[test]
    fn size_must_match_quantiles() {
        let x = odm([0.1, 0.2, 0.3, 0.4]);
        let q = DistanceQuantiles::from_values(&[0.0, 1.0], 1).unwrap();
        assert!(matches!(spssim(&x, &x, &q), Err(ValidateError::LengthMismatch { expected: 2, got: 4, .. })));
    }
}
