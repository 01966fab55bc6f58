use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

use crate::conversion::config::{HarnessConfig, OUTPUT_SUFFIX};

/// Raw bytes of an OS string; names that are not valid UTF-8 survive intact
#[cfg(unix)]
pub(crate) fn os_bytes(s: &OsStr) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(s.as_bytes())
}

#[cfg(not(unix))]
pub(crate) fn os_bytes(s: &OsStr) -> Cow<'_, [u8]> {
    match s.to_string_lossy() {
        Cow::Borrowed(text) => Cow::Borrowed(text.as_bytes()),
        Cow::Owned(text) => Cow::Owned(text.into_bytes()),
    }
}

#[cfg(unix)]
fn os_string(bytes: Vec<u8>) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(bytes)
}

#[cfg(not(unix))]
fn os_string(bytes: Vec<u8>) -> OsString {
    OsString::from(String::from_utf8_lossy(&bytes).into_owned())
}

/// Replace every occurrence of `from` in `haystack` with `to`
fn replace_bytes(haystack: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
    if from.is_empty() {
        return haystack.to_vec();
    }

    let mut out = Vec::with_capacity(haystack.len());
    let mut rest = haystack;
    while !rest.is_empty() {
        if rest.starts_with(from) {
            out.extend_from_slice(to);
            rest = &rest[from.len()..];
        } else {
            out.push(rest[0]);
            rest = &rest[1..];
        }
    }
    out
}

/// Strip `extension` from a file name and turn hyphens into underscores.
///
/// `derive_name("address-offset.wast", ".wast") == "address_offset"`.
pub fn derive_name(file_name: impl AsRef<OsStr>, extension: &str) -> OsString {
    let bytes = os_bytes(file_name.as_ref());
    let stem = bytes
        .strip_suffix(extension.as_bytes())
        .unwrap_or(&bytes[..]);
    os_string(stem.iter().map(|&b| if b == b'-' { b'_' } else { b }).collect())
}

/// Join `child` onto `parent` and normalize the result lexically.
pub fn norm_join(parent: &Path, child: &Path) -> PathBuf {
    normalize(&parent.join(child))
}

/// Collapse `.` and `name/..` components without touching the file system.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Replace every literal occurrence of `from` in `parent` with `to`.
///
/// This is plain substitution over the raw path bytes, so a token that also
/// appears in the root prefix or in a nested directory name is replaced there
/// as well.
pub fn map_output_dir(parent: &Path, from: &str, to: &str) -> PathBuf {
    let bytes = os_bytes(parent.as_os_str());
    PathBuf::from(os_string(replace_bytes(&bytes, from.as_bytes(), to.as_bytes())))
}

/// `output_dir/<name>.json`
pub fn output_file_path(output_dir: &Path, name: &OsStr) -> PathBuf {
    let mut file = name.to_os_string();
    file.push(OUTPUT_SUFFIX);
    output_dir.join(file)
}

/// Output directory and derived name for a source file found under `parent`.
pub fn map_source(config: &HarnessConfig, parent: &Path, file_name: &OsStr) -> (PathBuf, OsString) {
    let name = derive_name(file_name, &config.extension);
    let output_dir = map_output_dir(parent, &config.testsuite, &config.output).join(&name);
    (output_dir, name)
}

/// Map a source file onto the converter artifact it should produce.
///
/// Returns `None` when the path has no parent or file name.
pub fn map_input_to_output(config: &HarnessConfig, input_file: &Path) -> Option<PathBuf> {
    let parent = input_file.parent()?;
    let (output_dir, name) = map_source(config, parent, input_file.file_name()?);
    Some(output_file_path(&output_dir, &name))
}
