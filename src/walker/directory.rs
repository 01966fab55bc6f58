use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::HarnessResult;
use crate::walker::dangling_link;
use crate::walker::filter::{is_json_file, is_source_file};

/// Find converter artifacts (.json files) anywhere under `dir`, sorted by path.
///
/// Dangling symlinks are skipped since there is nothing to parse behind them.
pub fn find_json_files(dir: &Path) -> HarnessResult<Vec<PathBuf>> {
    let mut json_files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if dangling_link(&err).is_some() => continue,
            Err(err) => return Err(err.into()),
        };
        let path = entry.path();
        if is_json_file(path) {
            json_files.push(path.to_path_buf());
        }
    }

    Ok(json_files)
}

/// Find files under `dir` whose name ends with `extension`, sorted by path.
///
/// A dangling symlink with a matching name still counts as a source, the same
/// way the walk would dispatch it.
pub fn find_source_files(dir: &Path, extension: &str) -> HarnessResult<Vec<PathBuf>> {
    let mut sources = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => match dangling_link(&err) {
                Some((link, file_name)) => {
                    if is_source_file(&file_name, extension) {
                        sources.push(link);
                    }
                    continue;
                }
                None => return Err(err.into()),
            },
        };
        if entry.file_type().is_dir() {
            continue;
        }
        if is_source_file(entry.file_name(), extension) {
            sources.push(entry.path().to_path_buf());
        }
    }

    Ok(sources)
}
