use std::ffi::OsStr;
use std::path::Path;

use crate::cli::path_mapping::os_bytes;

/// Return true if `file_name` ends with the literal source suffix
pub fn is_source_file(file_name: impl AsRef<OsStr>, extension: &str) -> bool {
    os_bytes(file_name.as_ref()).ends_with(extension.as_bytes())
}

/// Return true if the path is an existing file with a .json extension
pub fn is_json_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "json")
}
