//! JSON run records: the sampler parameters and the divergence scores of a
//! run.
//!
//! A single run is written as a pretty-printed document (`parameters.json`);
//! parameter searches append one compact record per line to a JSON Lines log.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use mv_sim::{SampleSummary, SamplerConfig};

use crate::{OutputError, OutputResult};

/// Divergence of one ODM from the ground truth at one spatial scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivergenceScore {
    /// Zone set name, e.g. `"municipality"`.
    pub scale:           String,
    /// Which ODM was scored, e.g. `"model"` or `"gravity"`.
    pub odm:             String,
    pub kl:              f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spssim_mean:     Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spssim_weighted: Option<f64>,
}

/// Everything needed to reproduce and rank one sampler run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub parameters: SamplerConfig,
    pub users:      usize,
    pub visits:     usize,
    #[serde(default)]
    pub scores:     Vec<DivergenceScore>,
}

impl RunRecord {
    pub fn new(parameters: SamplerConfig, summary: &SampleSummary) -> Self {
        Self { parameters, users: summary.users, visits: summary.visits, scores: Vec::new() }
    }
}

/// Write `value` as pretty-printed JSON, replacing `path`.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> OutputResult<()> {
    let mut w = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut w, value)?;
    w.flush()?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> OutputResult<T> {
    Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
}

/// Append `value` as one line of a JSON Lines log, creating the file if
/// needed.
pub fn append_json_line<T: Serialize>(path: &Path, value: &T) -> OutputResult<()> {
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    OpenOptions::new().create(true).append(true).open(path)?.write_all(&line)?;
    Ok(())
}

/// Every record of a JSON Lines log, skipping blank lines.
pub fn read_json_lines<T: DeserializeOwned>(path: &Path) -> OutputResult<Vec<T>> {
    let text = std::fs::read_to_string(path)?;
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).map_err(OutputError::from))
        .collect()
}
