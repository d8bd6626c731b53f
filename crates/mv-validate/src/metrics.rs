//! Per-distance-bin demand statistics for one or more ODMs.

use tracing::debug;

use mv_odm::Odm;
use mv_spatial::DistanceQuantiles;

use crate::{ValidateError, ValidateResult};

/// Sum, mean and population variance of one ODM's cells inside a bin.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesStats {
    pub sum:      f64,
    pub mean:     f64,
    pub variance: f64,
}

impl SeriesStats {
    fn over(values: impl Iterator<Item = f64> + Clone) -> Self {
        let (n, sum) = values.clone().fold((0usize, 0.0), |(n, s), v| (n + 1, s + v));
        if n == 0 {
            return Self::default();
        }
        let mean = sum / n as f64;
        let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
        Self { sum, mean, variance }
    }
}

/// One row of a [`MetricsTable`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinMetrics {
    pub lower:      f64,
    pub upper:      f64,
    pub pair_count: usize,
    /// One entry per title, in title order.
    pub stats:      Vec<SeriesStats>,
}

/// Distance-bin statistics for a set of titled ODMs.
///
/// Columns are addressed as `"<title>_sum"`, `"<title>_mean"` and
/// `"<title>_variance"`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsTable {
    titles: Vec<String>,
    bins:   Vec<BinMetrics>,
}

impl MetricsTable {
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn bins(&self) -> &[BinMetrics] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    fn position(&self, title: &str) -> ValidateResult<usize> {
        self.titles
            .iter()
            .position(|t| t == title)
            .ok_or_else(|| ValidateError::UnknownTitle(title.to_owned()))
    }

    /// Per-bin demand share of `title`.
    pub fn sums(&self, title: &str) -> ValidateResult<Vec<f64>> {
        let i = self.position(title)?;
        Ok(self.bins.iter().map(|b| b.stats[i].sum).collect())
    }

    /// A named column, e.g. `"model_variance"`.
    pub fn column(&self, name: &str) -> ValidateResult<Vec<f64>> {
        let unknown = || ValidateError::UnknownTitle(name.to_owned());
        let (title, stat) = name.rsplit_once('_').ok_or_else(unknown)?;
        let i = self.position(title).map_err(|_| unknown())?;
        let pick: fn(&SeriesStats) -> f64 = match stat {
            "sum" => |s: &SeriesStats| s.sum,
            "mean" => |s: &SeriesStats| s.mean,
            "variance" => |s: &SeriesStats| s.variance,
            _ => return Err(unknown()),
        };
        Ok(self.bins.iter().map(|b| pick(&b.stats[i])).collect())
    }

    /// All column names, in table order.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = vec!["lower".to_owned(), "upper".to_owned(), "pair_count".to_owned()];
        for t in &self.titles {
            names.extend(["sum", "mean", "variance"].map(|s| format!("{t}_{s}")));
        }
        names
    }
}

/// Builds [`MetricsTable`]s from a precomputed distance grouping.
pub struct DistanceMetrics;

impl DistanceMetrics {
    /// Statistics of each ODM over every distance bin.
    ///
    /// `odms` and `titles` pair up by position; every ODM must cover the
    /// same zone pairs as `quantiles`.
    pub fn compute(quantiles: &DistanceQuantiles, odms: &[&Odm], titles: &[&str]) -> ValidateResult<MetricsTable> {
        if odms.len() != titles.len() {
            return Err(ValidateError::LengthMismatch { what: "titles", expected: odms.len(), got: titles.len() });
        }
        for (i, t) in titles.iter().enumerate() {
            if titles[..i].contains(t) {
                return Err(ValidateError::DuplicateTitle((*t).to_owned()));
            }
        }
        for odm in odms {
            let got = odm.as_slice().len();
            if got != quantiles.pair_count() {
                return Err(ValidateError::LengthMismatch {
                    what:     "ODM cells",
                    expected: quantiles.pair_count(),
                    got,
                });
            }
        }

        let bins: Vec<BinMetrics> = quantiles
            .bins()
            .iter()
            .map(|bin| BinMetrics {
                lower:      bin.lower,
                upper:      bin.upper,
                pair_count: bin.pairs.len(),
                stats:      odms
                    .iter()
                    .map(|odm| {
                        let cells = odm.as_slice();
                        SeriesStats::over(bin.pairs.iter().map(|&p| cells[p]))
                    })
                    .collect(),
            })
            .collect();

        debug!(bins = bins.len(), series = titles.len(), "distance metrics computed");
        Ok(MetricsTable { titles: titles.iter().map(|t| (*t).to_owned()).collect(), bins })
    }
}
