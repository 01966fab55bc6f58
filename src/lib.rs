//! wast test-suite harness
//!
//! Walks a WebAssembly spec test suite and runs an external converter
//! (`wast2json`) on every `.wast` script, writing each artifact into an
//! output tree that mirrors the suite.

pub mod audit;
pub mod cli;
pub mod conversion;
pub mod error;
pub mod manifest;
pub mod walker;

// Re-export commonly used types
pub use conversion::{
    ConversionJob, ConversionOutcome, Converter, HarnessConfig, ProcessConverter, RunReport,
};
pub use error::{HarnessError, HarnessErrorKind, HarnessResult};
pub use walker::{run, walk};

/// Convert every source script under `config`'s test-suite root with the
/// configured converter executable
pub fn convert_testsuite(config: &HarnessConfig) -> HarnessResult<RunReport> {
    let mut converter = ProcessConverter::new(&config.exe);
    walker::run(config, &mut converter)
}
