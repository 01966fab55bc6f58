//! Out-of-band audit of a populated output tree
//!
//! Conversion failures never stop a run, so the output tree can be partially
//! populated. The audit parses every artifact and lists the source files
//! whose artifact never appeared.

use indicatif::ProgressBar;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::cli::path_mapping::map_input_to_output;
use crate::conversion::HarnessConfig;
use crate::error::{HarnessError, HarnessErrorKind, HarnessResult};
use crate::manifest::Manifest;
use crate::walker::directory::{find_json_files, find_source_files};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ManifestStatus {
    Valid {
        commands: usize,
        missing_modules: Vec<PathBuf>,
    },
    Invalid {
        message: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestCheck {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: ManifestStatus,
}

impl ManifestCheck {
    pub fn is_valid(&self) -> bool {
        matches!(
            &self.status,
            ManifestStatus::Valid { missing_modules, .. } if missing_modules.is_empty()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub output_root: PathBuf,
    pub manifests: Vec<ManifestCheck>,
    /// Commands per type across all valid manifests
    pub command_totals: BTreeMap<String, usize>,
    /// Source files whose artifact does not exist
    pub missing_manifests: Vec<PathBuf>,
    pub collected_at: chrono::DateTime<chrono::Utc>,
}

impl AuditReport {
    pub fn valid_count(&self) -> usize {
        self.manifests.iter().filter(|m| m.is_valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.manifests.len() - self.valid_count()
    }

    pub fn is_clean(&self) -> bool {
        self.invalid_count() == 0 && self.missing_manifests.is_empty()
    }
}

/// Audit the configured output tree
pub fn audit(config: &HarnessConfig, progress: &ProgressBar) -> HarnessResult<AuditReport> {
    let output_root = config.output_root();
    if !output_root.is_dir() {
        return Err(HarnessError::new(HarnessErrorKind::OutputNotFound { path: output_root }));
    }

    let json_files = find_json_files(&output_root)?;
    progress.set_length(json_files.len() as u64);

    let mut manifests = Vec::with_capacity(json_files.len());
    let mut command_totals = BTreeMap::new();

    for path in json_files {
        progress.set_message(display_name(&path));
        let status = check_manifest(&path, &mut command_totals);
        tracing::debug!(path = %path.display(), ?status, "checked manifest");
        manifests.push(ManifestCheck { path, status });
        progress.inc(1);
    }
    progress.finish_and_clear();

    let missing_manifests = missing_manifests(config)?;

    Ok(AuditReport {
        output_root,
        manifests,
        command_totals,
        missing_manifests,
        collected_at: chrono::Utc::now(),
    })
}

fn check_manifest(path: &Path, totals: &mut BTreeMap<String, usize>) -> ManifestStatus {
    match Manifest::from_path(path) {
        Ok(manifest) => {
            for (kind, count) in manifest.command_counts() {
                *totals.entry(kind.to_string()).or_insert(0) += count;
            }
            let dir = path.parent().unwrap_or(Path::new("."));
            ManifestStatus::Valid {
                commands: manifest.commands.len(),
                missing_modules: manifest.missing_modules(dir),
            }
        }
        Err(e) => ManifestStatus::Invalid {
            message: e.user_message(),
        },
    }
}

/// Source files under the test-suite root with no artifact at the mapped path.
///
/// An absent test-suite root yields an empty list.
fn missing_manifests(config: &HarnessConfig) -> HarnessResult<Vec<PathBuf>> {
    let suite = config.testsuite_root();
    if !suite.is_dir() {
        return Ok(Vec::new());
    }

    Ok(find_source_files(&suite, &config.extension)?
        .into_iter()
        .filter(|source| {
            map_input_to_output(config, source).is_some_and(|artifact| !artifact.is_file())
        })
        .collect())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
