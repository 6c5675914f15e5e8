//! Run storage.
//!
//! Each run lives in `<root>/<run_id>/` as `timeseries.jsonl` (one
//! [`TickRecord`] per line) plus `manifest.json`. The manifest is written
//! after the series, so a directory without one is an interrupted save and
//! never counts as a cached run.

use crate::types::{RunManifest, TickRecord};
use crate::{ResultsError, ResultsResult};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "manifest.json";
const TIMESERIES_FILE: &str = "timeseries.jsonl";

#[derive(Clone, Debug)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        fs::create_dir_all(&root_dir)?;
        Ok(Self { root_dir })
    }

    /// Store next to a scenario file, under `.cruise/runs`.
    pub fn for_scenario(scenario_path: &Path) -> ResultsResult<Self> {
        let dir = scenario_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "scenario path has no parent directory".to_string(),
            })?;
        Self::new(dir.join(".cruise").join("runs"))
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join(MANIFEST_FILE).is_file()
    }

    /// Stream `records` to disk and commit the run with its manifest.
    ///
    /// The series must hold exactly `manifest.expected_ticks()` rows; on a
    /// mismatch nothing is committed and the partial directory is removed.
    pub fn save_run<I>(&self, manifest: &RunManifest, records: I) -> ResultsResult<usize>
    where
        I: IntoIterator<Item = TickRecord>,
    {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;
        let _ = fs::remove_file(run_dir.join(MANIFEST_FILE));

        let mut out = BufWriter::new(File::create(run_dir.join(TIMESERIES_FILE))?);
        let mut written = 0;
        for record in records {
            serde_json::to_writer(&mut out, &record)?;
            out.write_all(b"\n")?;
            written += 1;
        }
        out.flush()?;

        let expected = manifest.expected_ticks();
        if written != expected {
            fs::remove_dir_all(&run_dir)?;
            return Err(ResultsError::TickCountMismatch {
                run_id: manifest.run_id.clone(),
                expected,
                found: written,
            });
        }

        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(run_dir.join(MANIFEST_FILE), manifest_json)?;
        Ok(written)
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        if !self.has_run(run_id) {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        let content = fs::read_to_string(self.run_dir(run_id).join(MANIFEST_FILE))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_timeseries(&self, run_id: &str) -> ResultsResult<Vec<TickRecord>> {
        let path = self.run_dir(run_id).join(TIMESERIES_FILE);
        if !path.is_file() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let mut records = Vec::new();
        for (index, line) in BufReader::new(File::open(path)?).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|source| {
                ResultsError::CorruptTimeseries {
                    run_id: run_id.to_string(),
                    line: index + 1,
                    source,
                }
            })?;
            records.push(record);
        }
        Ok(records)
    }

    /// Manifest and series of a committed run, checked against each other.
    pub fn load_run(&self, run_id: &str) -> ResultsResult<(RunManifest, Vec<TickRecord>)> {
        let manifest = self.load_manifest(run_id)?;
        let records = self.load_timeseries(run_id)?;
        if records.len() != manifest.expected_ticks() {
            return Err(ResultsError::TickCountMismatch {
                run_id: run_id.to_string(),
                expected: manifest.expected_ticks(),
                found: records.len(),
            });
        }
        Ok((manifest, records))
    }

    /// Every committed run, oldest first.
    pub fn list_runs(&self) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();
        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let run_id = entry.file_name().to_string_lossy().to_string();
            if let Ok(manifest) = self.load_manifest(&run_id) {
                runs.push(manifest);
            }
        }
        runs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(runs)
    }

    /// Runs of one scenario across all seeds, oldest first.
    pub fn list_runs_for(&self, scenario_key: &str) -> ResultsResult<Vec<RunManifest>> {
        Ok(self
            .list_runs()?
            .into_iter()
            .filter(|m| m.scenario_key == scenario_key)
            .collect())
    }
}
