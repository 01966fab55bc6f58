//! Conversion dispatch module
//!
//! Configuration, the converter seam and the end-of-run report.

pub mod config;
pub mod converter;
pub mod report;

pub use config::HarnessConfig;
pub use converter::{ConversionJob, ConversionOutcome, Converter, ProcessConverter};
pub use report::{FailedConversion, RunReport};
