//! Configuration for a harness run
//!
//! Built once at startup and passed by reference; nothing is read from
//! globals during a walk.

use std::path::{Path, PathBuf};

/// Default name of the input directory under the root
pub const DEFAULT_TESTSUITE: &str = "testsuite";
/// Default name of the mirrored output directory under the root
pub const DEFAULT_OUTPUT: &str = "output";
/// Default source extension
pub const DEFAULT_EXTENSION: &str = ".wast";
/// Default converter executable, resolved against the root
pub const DEFAULT_EXE: &str = "wast2json.exe";
/// Suffix of every converter artifact
pub const OUTPUT_SUFFIX: &str = ".json";

/// Flags passed to the converter ahead of the input file, in order
pub const CONVERTER_FLAGS: [&str; 3] = ["--enable-all", "--debug-names", "--no-check"];
/// Flag introducing the converter's output path
pub const CONVERTER_OUTPUT_FLAG: &str = "-o";

/// Harness configuration options
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Absolute root the run is anchored at
    pub root: PathBuf,
    /// Path segment naming the input tree; also the token replaced in output paths
    pub testsuite: String,
    /// Replacement token for output paths
    pub output: String,
    /// Converter executable
    pub exe: PathBuf,
    /// Literal file-name suffix selecting source files
    pub extension: String,
}

impl HarnessConfig {
    /// Default configuration anchored at `root`
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            exe: root.join(DEFAULT_EXE),
            root,
            testsuite: DEFAULT_TESTSUITE.to_string(),
            output: DEFAULT_OUTPUT.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Directory the walk starts from
    pub fn testsuite_root(&self) -> PathBuf {
        crate::cli::path_mapping::norm_join(&self.root, Path::new(&self.testsuite))
    }

    /// Root of the mirrored output tree
    pub fn output_root(&self) -> PathBuf {
        crate::cli::path_mapping::norm_join(&self.root, Path::new(&self.output))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.testsuite.is_empty() {
            return Err("Test-suite directory name must not be empty".to_string());
        }
        if self.output.is_empty() {
            return Err("Output directory name must not be empty".to_string());
        }
        if self.testsuite == self.output {
            return Err(format!(
                "Test-suite and output directories must differ (both '{}')",
                self.testsuite
            ));
        }
        if self.extension.is_empty() {
            return Err("Source extension must not be empty".to_string());
        }
        if self.exe.as_os_str().is_empty() {
            return Err("Converter executable path must not be empty".to_string());
        }
        Ok(())
    }
}
