//! CSV readers for observation tables, visit tables and ground-truth ODMs.
//!
//! # Observation table
//!
//! ```csv
//! userid,tweetid,createdat,latitude,longitude,weekday,hourofday,region,label
//! 7,1001,2019-05-06 08:12:00+00:00,59.33,18.06,1,8,0,home
//! 7,1002,2019-05-06T12:40:00Z,59.34,18.07,1,12,1,work
//! ```
//!
//! `createdat` accepts RFC 3339 and `YYYY-MM-DD HH:MM:SS[.f][±hh:mm]`; a
//! time without offset is taken as UTC.  `weekday` (`0` = Sunday) and
//! `hourofday` may be omitted or left empty, in which case they are derived
//! from `createdat` in UTC.  `region` is `-1` for unclustered observations;
//! `label` is `home`, `work` or `other`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};
use serde::Deserialize;

use mv_core::{GeoPoint, Label, Observation, RegionId, UserId, Visit};
use mv_odm::Odm;
use mv_spatial::ZoneSet;

use crate::{OdmRow, OutputError, OutputResult, VisitRow};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ObservationRecord {
    userid:    u64,
    tweetid:   u64,
    createdat: String,
    latitude:  f64,
    longitude: f64,
    #[serde(default)]
    weekday:   Option<u8>,
    #[serde(default)]
    hourofday: Option<u8>,
    region:    i64,
    label:     String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load an observation table from a CSV file.
pub fn read_observations(path: &Path) -> OutputResult<Vec<Observation>> {
    read_observations_reader(File::open(path)?)
}

/// Like [`read_observations`] but accepts any `Read` source.
pub fn read_observations_reader<R: Read>(reader: R) -> OutputResult<Vec<Observation>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut out = Vec::new();

    for (i, result) in csv_reader.deserialize::<ObservationRecord>().enumerate() {
        let r = result?;
        let row = i + 1;
        let created_at = parse_timestamp(&r.createdat)
            .ok_or_else(|| parse_error(row, format!("unrecognised timestamp {:?}", r.createdat)))?;
        let utc = DateTime::from_timestamp(created_at, 0)
            .ok_or_else(|| parse_error(row, format!("timestamp {created_at} out of range")))?;
        let label = r.label.trim().parse::<Label>().map_err(|e| parse_error(row, e.to_string()))?;

        out.push(Observation {
            user:        UserId(r.userid),
            tweet_id:    r.tweetid,
            created_at,
            location:    GeoPoint::new(r.latitude, r.longitude),
            weekday:     r.weekday.unwrap_or(utc.weekday().num_days_from_sunday() as u8),
            hour_of_day: r.hourofday.unwrap_or(utc.hour() as u8),
            region:      RegionId(r.region),
            label,
        });
    }
    Ok(out)
}

/// Load a visit table written by [`CsvVisitWriter`][crate::CsvVisitWriter].
pub fn read_visits(path: &Path) -> OutputResult<Vec<Visit>> {
    read_visits_reader(File::open(path)?)
}

/// Like [`read_visits`] but accepts any `Read` source.
pub fn read_visits_reader<R: Read>(reader: R) -> OutputResult<Vec<Visit>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<VisitRow>()
        .enumerate()
        .map(|(i, result)| result?.into_visit().map_err(|m| parse_error(i + 1, m)))
        .collect()
}

/// Load a sparse `ozone,dzone,value` table and reindex it onto `zones`.
///
/// See [`Odm::from_pairs`] for how unknown and missing pairs are handled.
pub fn read_odm(path: &Path, zones: &ZoneSet) -> OutputResult<Odm> {
    read_odm_reader(File::open(path)?, zones)
}

/// Like [`read_odm`] but accepts any `Read` source.
pub fn read_odm_reader<R: Read>(reader: R, zones: &ZoneSet) -> OutputResult<Odm> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let rows = csv_reader.deserialize::<OdmRow>().collect::<Result<Vec<_>, _>>()?;
    let odm = Odm::from_pairs(zones, rows.iter().map(|r| (r.ozone.as_str(), r.dzone.as_str(), r.value)))?;
    Ok(odm)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Parse a timestamp into Unix seconds.
pub fn parse_timestamp(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.timestamp());
    }
    if let Ok(t) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(t.timestamp());
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|t| t.and_utc().timestamp())
}

fn parse_error(row: usize, message: String) -> OutputError {
    OutputError::Parse { row, message }
}
