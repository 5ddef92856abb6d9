//! Lookup report: one line per key and the average hop count.
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use chordsim_core::dht::LookupOutcome;
use chordsim_core::keys::Key;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;
use crate::util::ensure_parent_dir;

/// Lookup of one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRecord {
    pub key: Key,
    pub outcome: LookupOutcome,
    /// The peer answering the lookup stores the key.
    pub verified: bool,
}

impl LookupRecord {
    pub fn hop_count(&self) -> usize {
        self.outcome.hop_count()
    }
}

impl fmt::Display for LookupRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {} => ",
            self.key.name,
            self.key.index,
            self.outcome.visited().join(" -> ")
        )?;
        match &self.outcome {
            LookupOutcome::Found(found) => write!(f, "{} ({})", found.peer_name, found.peer_id),
            LookupOutcome::Miss(miss) => write!(f, "MISS at {} ({})", miss.peer_name, miss.peer_id),
        }
    }
}

/// All lookups of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub node_count: usize,
    pub m: u32,
    pub records: Vec<LookupRecord>,
}

impl SimulationReport {
    /// Mean length of the visited paths, misses included. Zero without lookups.
    pub fn average_hop_count(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let total: usize = self.records.iter().map(|r| r.hop_count()).sum();
        total as f64 / self.records.len() as f64
    }

    pub fn misses(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_miss()).count()
    }

    /// Lookups that reached a peer not storing the key.
    pub fn unverified(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome.is_found() && !r.verified)
            .count()
    }

    pub fn summary_line(&self) -> String {
        format!("average hop count = {:.2}", self.average_hop_count())
    }

    /// Write the report to `path`, creating missing parent directories.
    pub fn write_fs<P>(&self, path: P) -> Result<PathBuf>
    where P: AsRef<Path> {
        let path = path.as_ref().to_path_buf();
        ensure_parent_dir(&path)?;
        fs::write(&path, self.to_string()).map_err(|e| Error::WriteFileError(e.to_string()))?;
        tracing::info!("report written to {:?}", path);
        Ok(path)
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{}", record)?;
        }
        writeln!(f, "{}", self.summary_line())
    }
}
