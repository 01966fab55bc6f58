//! Model of the converter's JSON artifact
//!
//! Each `<name>.json` describes one script: the source it came from and the
//! ordered list of commands (`module`, `assert_return`, `register`, ...). Only
//! the fields the audit needs are modelled; everything else is ignored.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{HarnessError, HarnessErrorKind, HarnessResult};

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Manifest {
    pub source_filename: String,
    pub commands: Vec<ManifestCommand>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ManifestCommand {
    #[serde(rename = "type")]
    pub kind: String,
    pub line: usize,
    /// Binary or text module written next to the manifest
    #[serde(default)]
    pub filename: Option<String>,
}

impl FromStr for Manifest {
    type Err = serde_json::Error;

    fn from_str(json: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(json)
    }
}

impl Manifest {
    /// Read and parse a manifest file
    pub fn from_path(path: &Path) -> HarnessResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        json.parse::<Self>().map_err(|e| {
            HarnessError::new(HarnessErrorKind::manifest(e.to_string(), path.to_path_buf()))
        })
    }

    /// Number of commands per command type
    pub fn command_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for command in &self.commands {
            *counts.entry(command.kind.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Module files referenced by the manifest that are absent from `dir`
    pub fn missing_modules(&self, dir: &Path) -> Vec<PathBuf> {
        self.commands
            .iter()
            .filter_map(|c| c.filename.as_deref())
            .map(|f| dir.join(f))
            .filter(|p| !p.exists())
            .collect()
    }
}
