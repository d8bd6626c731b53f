//! CSV output backend.
//!
//! [`CsvVisitWriter`] streams visits to `visits.csv`; the free functions write
//! one-shot tables (ODMs, distance metrics, SpSSIM reports).

use std::fs::File;
use std::path::Path;

use csv::Writer;

use mv_odm::Odm;
use mv_spatial::ZoneSet;
use mv_validate::{MetricsTable, SpssimReport};

use crate::writer::VisitWriter;
use crate::{OutputResult, VisitRow};

/// Header of `visits.csv`.
pub const VISIT_COLUMNS: [&str; 7] = ["userid", "day", "timeslot", "kind", "latitude", "longitude", "region"];

/// Writes simulated visits to `visits.csv`.
pub struct CsvVisitWriter {
    visits:   Writer<File>,
    finished: bool,
}

impl CsvVisitWriter {
    /// Create `visits.csv` in `dir` and write the header row.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut visits = Writer::from_path(dir.join("visits.csv"))?;
        visits.write_record(VISIT_COLUMNS)?;
        Ok(Self { visits, finished: false })
    }
}

impl VisitWriter for CsvVisitWriter {
    fn write_visits(&mut self, rows: &[VisitRow]) -> OutputResult<()> {
        for row in rows {
            self.visits.write_record(&[
                row.userid.to_string(),
                row.day.to_string(),
                row.timeslot.to_string(),
                row.kind.clone(),
                row.latitude.to_string(),
                row.longitude.to_string(),
                row.region.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.visits.flush()?;
        Ok(())
    }
}

// ── Tables ────────────────────────────────────────────────────────────────────

/// Write the non-zero cells of `odm` as `ozone,dzone,value`, with zones
/// named by their labels in `zones`.
pub fn write_odm(path: &Path, zones: &ZoneSet, odm: &Odm) -> OutputResult<()> {
    let mut w = Writer::from_path(path)?;
    w.write_record(["ozone", "dzone", "value"])?;
    for (o, d, value) in odm.pairs() {
        let value = value.to_string();
        w.write_record([zones.label(o), zones.label(d), value.as_str()])?;
    }
    w.flush()?;
    Ok(())
}

/// One row per distance bin, columns as [`MetricsTable::column_names`].
pub fn write_metrics(path: &Path, table: &MetricsTable) -> OutputResult<()> {
    let mut w = Writer::from_path(path)?;
    w.write_record(table.column_names())?;
    for bin in table.bins() {
        let mut record = vec![bin.lower.to_string(), bin.upper.to_string(), bin.pair_count.to_string()];
        for s in &bin.stats {
            record.extend([s.sum.to_string(), s.mean.to_string(), s.variance.to_string()]);
        }
        w.write_record(&record)?;
    }
    w.flush()?;
    Ok(())
}

/// Per-bin SpSSIM scores and moments.
pub fn write_spssim(path: &Path, report: &SpssimReport) -> OutputResult<()> {
    let mut w = Writer::from_path(path)?;
    w.write_record([
        "lower", "upper", "score",
        "x_weight", "y_weight", "x_mean", "y_mean", "x_variance", "y_variance", "covariance",
    ])?;
    for b in &report.bins {
        w.write_record(
            [
                b.lower, b.upper, b.score,
                b.x_weight, b.y_weight, b.x_mean, b.y_mean, b.x_variance, b.y_variance, b.covariance,
            ]
            .map(|v| v.to_string()),
        )?;
    }
    w.flush()?;
    Ok(())
}
