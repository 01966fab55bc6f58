//! Test-suite traversal and conversion dispatch
//!
//! [`walk`] descends depth-first from a directory and hands every file whose
//! name ends with the configured extension to a [`Converter`]. Converter
//! outcomes only reach the [`RunReport`]; traversal and directory-creation
//! failures abort the walk.

pub mod directory;
pub mod filter;

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::cli::path_mapping::{map_source, normalize, output_file_path};
use crate::conversion::{ConversionJob, Converter, HarnessConfig, RunReport};
use crate::error::{HarnessError, HarnessErrorKind, HarnessResult};

/// Walk the configured test-suite root and return the finished report
pub fn run<C: Converter + ?Sized>(
    config: &HarnessConfig,
    converter: &mut C,
) -> HarnessResult<RunReport> {
    let root = config.testsuite_root();
    let mut report = RunReport::new(&root);

    tracing::info!(root = %root.display(), exe = %config.exe.display(), "walking test suite");
    walk(config, &root, converter, &mut report)?;
    report.finish();
    tracing::info!(
        dispatched = report.dispatched,
        failed = report.failed,
        "walk finished"
    );

    Ok(report)
}

/// Depth-first traversal of `dir`, dispatching a conversion for each source file
pub fn walk<C: Converter + ?Sized>(
    config: &HarnessConfig,
    dir: &Path,
    converter: &mut C,
    report: &mut RunReport,
) -> HarnessResult<()> {
    ensure_directory(dir)?;

    // Links are followed like a plain `is_dir` check would; a loop surfaces
    // as a walk error. A dangling link is just a file that is not a directory.
    for entry in WalkDir::new(dir).follow_links(true) {
        let (path, is_dir, file_name) = match entry {
            Ok(entry) => (
                normalize(entry.path()),
                entry.file_type().is_dir(),
                entry.file_name().to_os_string(),
            ),
            Err(err) => match dangling_link(&err) {
                Some((link, file_name)) => {
                    tracing::debug!(link = %link.display(), "dangling symlink");
                    (normalize(&link), false, file_name)
                }
                None => return Err(err.into()),
            },
        };

        if is_dir {
            tracing::trace!(dir = %path.display(), "entering directory");
            report.record_directory();
            continue;
        }

        if filter::is_source_file(&file_name, &config.extension) {
            let parent = path.parent().unwrap_or(dir);
            dispatch(config, &path, parent, &file_name, converter, report)?;
        } else {
            report.record_ignored();
        }
    }

    Ok(())
}

/// Path and name of a symlink whose target does not exist, if `err` is one.
///
/// walkdir cannot stat the target of such a link while following links;
/// every other walk error, loops included, stays fatal.
pub(crate) fn dangling_link(err: &walkdir::Error) -> Option<(PathBuf, OsString)> {
    if err.loop_ancestor().is_some() || err.depth() == 0 {
        return None;
    }
    if err.io_error()?.kind() != std::io::ErrorKind::NotFound {
        return None;
    }

    let path = err.path()?;
    let is_link = std::fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if !is_link {
        return None;
    }

    Some((path.to_path_buf(), path.file_name()?.to_os_string()))
}

/// Build the job for a source file found under `parent`
pub fn prepare_job(
    config: &HarnessConfig,
    input: &Path,
    parent: &Path,
    file_name: &OsStr,
) -> ConversionJob {
    let (output_dir, name) = map_source(config, parent, file_name);
    ConversionJob {
        input: input.to_path_buf(),
        output_file: output_file_path(&output_dir, &name),
        output_dir,
        name,
    }
}

/// Create the job's output directory and run the converter on it.
///
/// Only a directory-creation failure is an error; the converter's outcome is
/// recorded and otherwise ignored.
pub fn dispatch<C: Converter + ?Sized>(
    config: &HarnessConfig,
    input: &Path,
    parent: &Path,
    file_name: &OsStr,
    converter: &mut C,
    report: &mut RunReport,
) -> HarnessResult<()> {
    let job = prepare_job(config, input, parent, file_name);

    if !job.output_dir.exists() {
        std::fs::create_dir_all(&job.output_dir)
            .map_err(|e| HarnessError::io(&job.output_dir, e))?;
    }

    tracing::debug!(
        input = %job.input.display(),
        output = %job.output_file.display(),
        "dispatching conversion"
    );
    let outcome = converter.convert(&job);
    if !outcome.is_success() {
        tracing::warn!(input = %job.input.display(), "converter {}", outcome.describe());
    }
    report.record(&job, outcome);

    Ok(())
}

fn ensure_directory(dir: &Path) -> HarnessResult<()> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(HarnessError::new(HarnessErrorKind::NotADirectory {
            path: dir.to_path_buf(),
        })),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(HarnessError::with_source(
            HarnessErrorKind::RootNotFound {
                path: dir.to_path_buf(),
            },
            e,
        )),
        Err(e) => Err(HarnessError::io(dir, e)),
    }
}
