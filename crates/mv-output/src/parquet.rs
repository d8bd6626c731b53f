//! Parquet output backend (feature `parquet`).
//!
//! Creates `visits.parquet` in the configured output directory.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, Int64Builder, StringBuilder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::VisitWriter;
use crate::{OutputResult, VisitRow};

fn visit_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("userid",    DataType::UInt64,  false),
        Field::new("day",       DataType::UInt32,  false),
        Field::new("timeslot",  DataType::UInt32,  false),
        Field::new("kind",      DataType::Utf8,    false),
        Field::new("latitude",  DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
        Field::new("region",    DataType::Int64,   false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes simulated visits to a Parquet file, one row group per batch.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetVisitWriter {
    visits: Option<ArrowWriter<File>>,
    schema: Arc<Schema>,
}

impl ParquetVisitWriter {
    /// Create `visits.parquet` in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let schema = visit_schema();
        let file = File::create(dir.join("visits.parquet"))?;
        let visits = ArrowWriter::try_new(file, Arc::clone(&schema), Some(snappy_props()))?;
        Ok(Self { visits: Some(visits), schema })
    }
}

impl VisitWriter for ParquetVisitWriter {
    fn write_visits(&mut self, rows: &[VisitRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.visits.as_mut() else {
            return Ok(());
        };

        let mut users      = UInt64Builder::new();
        let mut days       = UInt32Builder::new();
        let mut timeslots  = UInt32Builder::new();
        let mut kinds      = StringBuilder::new();
        let mut latitudes  = Float64Builder::new();
        let mut longitudes = Float64Builder::new();
        let mut regions    = Int64Builder::new();

        for row in rows {
            users.append_value(row.userid);
            days.append_value(row.day);
            timeslots.append_value(row.timeslot);
            kinds.append_value(&row.kind);
            latitudes.append_value(row.latitude);
            longitudes.append_value(row.longitude);
            regions.append_value(row.region);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.schema),
            vec![
                Arc::new(users.finish()),
                Arc::new(days.finish()),
                Arc::new(timeslots.finish()),
                Arc::new(kinds.finish()),
                Arc::new(latitudes.finish()),
                Arc::new(longitudes.finish()),
                Arc::new(regions.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.visits.take() {
            w.close()?;
        }
        Ok(())
    }
}
