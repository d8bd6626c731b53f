//! SQLite output backend (feature `sqlite`).
//!
//! Creates `visits.db` in the configured output directory with one `visits`
//! table.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::VisitWriter;
use crate::{OutputResult, VisitRow};

/// Writes simulated visits to an SQLite database.
pub struct SqliteVisitWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteVisitWriter {
    /// Open (or create) `visits.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("visits.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS visits (
                 userid    INTEGER NOT NULL,
                 day       INTEGER NOT NULL,
                 timeslot  INTEGER NOT NULL,
                 kind      TEXT    NOT NULL,
                 latitude  REAL    NOT NULL,
                 longitude REAL    NOT NULL,
                 region    INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl VisitWriter for SqliteVisitWriter {
    fn write_visits(&mut self, rows: &[VisitRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO visits \
                 (userid, day, timeslot, kind, latitude, longitude, region) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.userid as i64,
                    row.day,
                    row.timeslot,
                    row.kind,
                    row.latitude,
                    row.longitude,
                    row.region,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
