//! End-of-run report of converter outcomes
//!
//! Collected alongside the walk; it never feeds back into control flow or the
//! process exit code.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::conversion::converter::{ConversionJob, ConversionOutcome};
use crate::error::{HarnessError, HarnessResult};

/// A converter invocation that did not succeed
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FailedConversion {
    pub input: PathBuf,
    pub output: PathBuf,
    pub outcome: ConversionOutcome,
}

/// Aggregated outcome of one harness run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Test-suite root the walk started at
    pub root: PathBuf,
    /// Directories visited, the root included
    pub directories_visited: usize,
    /// Non-matching files skipped
    pub files_ignored: usize,
    /// Converter invocations
    pub dispatched: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Details for every unsuccessful invocation, in dispatch order
    pub failures: Vec<FailedConversion>,
    /// Wall-clock time of the run in milliseconds
    pub elapsed_ms: u64,
    pub collected_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip)]
    started: Instant,
}

impl RunReport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            directories_visited: 0,
            files_ignored: 0,
            dispatched: 0,
            succeeded: 0,
            failed: 0,
            failures: Vec::new(),
            elapsed_ms: 0,
            collected_at: chrono::Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn record_directory(&mut self) {
        self.directories_visited += 1;
    }

    pub fn record_ignored(&mut self) {
        self.files_ignored += 1;
    }

    /// Record the outcome of one dispatched job
    pub fn record(&mut self, job: &ConversionJob, outcome: ConversionOutcome) {
        self.dispatched += 1;
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
            self.failures.push(FailedConversion {
                input: job.input.clone(),
                output: job.output_file.clone(),
                outcome,
            });
        }
    }

    /// Stamp elapsed time and collection time
    pub fn finish(&mut self) {
        self.elapsed_ms = self.started.elapsed().as_millis() as u64;
        self.collected_at = chrono::Utc::now();
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Human-readable summary lines
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Converted {}/{} files from {} ({} directories, {} ignored)",
            self.succeeded,
            self.dispatched,
            self.root.display(),
            self.directories_visited,
            self.files_ignored
        )];
        for failure in &self.failures {
            lines.push(format!(
                "  {}: {}",
                failure.input.display(),
                failure.outcome.describe()
            ));
        }
        lines
    }

    /// Write the report as pretty JSON, creating parent directories
    pub fn write_json(&self, path: &Path) -> HarnessResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| HarnessError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| HarnessError::Other(anyhow::Error::new(e).context("serializing run report")))?;
        std::fs::write(path, json).map_err(|e| HarnessError::io(path, e))
    }
}
