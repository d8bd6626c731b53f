//! `mv-output` — file interchange for the mobility validation workspace.
//!
//! Reading:
//!
//! | Function              | Input                                               |
//! |-----------------------|-----------------------------------------------------|
//! | [`read_observations`] | cleaned, labelled observation table (CSV)           |
//! | [`read_visits`]       | visit table written by [`CsvVisitWriter`]           |
//! | [`read_odm`]          | sparse `ozone,dzone,value` ground truth (CSV)       |
//! | [`read_json`]         | run record or any JSON document                     |
//!
//! Visit persistence, three backends behind Cargo features:
//!
//! | Feature   | Backend     | Files created     |
//! |-----------|-------------|-------------------|
//! | *(none)*  | CSV         | `visits.csv`      |
//! | `sqlite`  | SQLite      | `visits.db`       |
//! | `parquet` | Parquet     | `visits.parquet`  |
//!
//! All backends implement [`VisitWriter`] and are driven by
//! [`VisitOutputObserver`], which implements `mv_sim::SampleObserver`.
//! One-shot tables ([`write_odm`], [`write_metrics`], [`write_spssim`]) are
//! CSV; run records ([`RunRecord`]) are JSON.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mv_output::{CsvVisitWriter, VisitOutputObserver};
//!
//! let writer = CsvVisitWriter::new(Path::new("./output"))?;
//! let mut obs = VisitOutputObserver::new(writer);
//! let summary = sampler.run(&population, &mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod reader;
pub mod record;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use self::csv::{write_metrics, write_odm, write_spssim, CsvVisitWriter, VISIT_COLUMNS};
pub use error::{OutputError, OutputResult};
pub use observer::VisitOutputObserver;
pub use reader::{
    parse_timestamp, read_observations, read_observations_reader, read_odm, read_odm_reader, read_visits,
    read_visits_reader,
};
pub use record::{append_json_line, read_json, read_json_lines, write_json, RunRecord, DivergenceScore};
pub use row::{OdmRow, VisitRow};
pub use writer::VisitWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteVisitWriter;

#[cfg(feature = "parquet")]
pub use self::parquet::ParquetVisitWriter;
