//! Converter invocation
//!
//! The walker hands each matching file to a [`Converter`]. The process-backed
//! implementation runs the external tool to completion and reports how it
//! ended. The outcome is never turned into an error.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use serde::Serialize;

use crate::conversion::config::{CONVERTER_FLAGS, CONVERTER_OUTPUT_FLAG};

/// One converter invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    /// Source file handed to the converter
    pub input: PathBuf,
    /// Directory created for this file's artifacts
    pub output_dir: PathBuf,
    /// Artifact the converter is told to write
    pub output_file: PathBuf,
    /// Derived name shared by the directory and the artifact
    pub name: OsString,
}

impl ConversionJob {
    /// Arguments following the executable:
    /// `--enable-all --debug-names --no-check <input> -o <output>`
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = CONVERTER_FLAGS.iter().map(|flag| OsString::from(*flag)).collect();
        args.push(self.input.clone().into_os_string());
        args.push(OsString::from(CONVERTER_OUTPUT_FLAG));
        args.push(self.output_file.clone().into_os_string());
        args
    }

    /// Full command line for display
    pub fn command_line(&self, exe: &Path) -> String {
        std::iter::once(exe.as_os_str().to_owned())
            .chain(self.args())
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How a converter invocation ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Succeeded,
    /// Non-zero exit; `code` is `None` when the process was killed by a signal
    Failed { code: Option<i32> },
    /// The executable could not be started at all
    SpawnFailed { message: String },
}

impl ConversionOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            Self::Succeeded
        } else {
            Self::Failed {
                code: status.code(),
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Succeeded => "ok".to_string(),
            Self::Failed { code: Some(code) } => format!("exited with status {}", code),
            Self::Failed { code: None } => "terminated by signal".to_string(),
            Self::SpawnFailed { message } => format!("failed to start: {}", message),
        }
    }
}

/// Something that turns one source file into one artifact
pub trait Converter {
    fn convert(&mut self, job: &ConversionJob) -> ConversionOutcome;
}

/// Runs the external converter executable synchronously
#[derive(Debug, Clone)]
pub struct ProcessConverter {
    exe: PathBuf,
}

impl ProcessConverter {
    pub fn new(exe: impl Into<PathBuf>) -> Self {
        Self { exe: exe.into() }
    }
}

impl Converter for ProcessConverter {
    fn convert(&mut self, job: &ConversionJob) -> ConversionOutcome {
        tracing::debug!(command = %job.command_line(&self.exe), "running converter");

        // stdio is inherited so converter diagnostics reach the terminal as-is
        match Command::new(&self.exe).args(job.args()).status() {
            Ok(status) => ConversionOutcome::from_status(status),
            Err(e) => ConversionOutcome::SpawnFailed {
                message: e.to_string(),
            },
        }
    }
}
