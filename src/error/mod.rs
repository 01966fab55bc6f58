//! Error types and handling infrastructure for the test-suite harness
//!
//! Only traversal, directory creation and configuration problems are errors.
//! A converter that exits non-zero is recorded in the run report instead.

use std::path::PathBuf;

/// Core error kinds raised while walking and dispatching
#[derive(Debug, thiserror::Error)]
pub enum HarnessErrorKind {
    #[error("Test-suite root not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Output root not found: {path}")]
    OutputNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Directory traversal failed: {message}")]
    Walk {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    #[error("Invalid manifest {path}: {message}")]
    Manifest { message: String, path: PathBuf },
}

impl HarnessErrorKind {
    pub fn io(message: String, path: Option<PathBuf>) -> Self {
        Self::Io { message, path }
    }

    pub fn configuration(message: String) -> Self {
        Self::Configuration { message }
    }

    pub fn manifest(message: String, path: PathBuf) -> Self {
        Self::Manifest { message, path }
    }
}

/// Main error type for harness operations
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("{kind}")]
    Harness {
        kind: HarnessErrorKind,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HarnessError {
    pub fn new(kind: HarnessErrorKind) -> Self {
        Self::Harness { kind, source: None }
    }

    pub fn with_source(kind: HarnessErrorKind, source: std::io::Error) -> Self {
        Self::Harness {
            kind,
            source: Some(source),
        }
    }

    /// Wrap an IO failure that happened at `path`
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{}: {}", path.display(), source);
        Self::with_source(HarnessErrorKind::io(message, Some(path)), source)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(HarnessErrorKind::configuration(message.into()))
    }

    pub fn kind(&self) -> Option<&HarnessErrorKind> {
        match self {
            Self::Harness { kind, .. } => Some(kind),
            Self::Other(_) => None,
        }
    }

    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Harness { kind, .. } => match kind {
                HarnessErrorKind::RootNotFound { path } => {
                    format!("Test-suite directory does not exist: {}", path.display())
                }
                HarnessErrorKind::OutputNotFound { path } => {
                    format!("Output directory does not exist: {}", path.display())
                }
                HarnessErrorKind::NotADirectory { path } => {
                    format!("Expected a directory but found a file: {}", path.display())
                }
                HarnessErrorKind::Walk {
                    message,
                    path: Some(path),
                } => format!("Failed to read {}: {}", path.display(), message),
                _ => self.to_string(),
            },
            Self::Other(err) => format!("Unexpected error: {}", err),
        }
    }
}

impl From<walkdir::Error> for HarnessError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf());
        let message = match err.loop_ancestor() {
            Some(ancestor) => format!("symlink loop back to {}", ancestor.display()),
            None => err
                .io_error()
                .map(|e| e.to_string())
                .unwrap_or_else(|| err.to_string()),
        };
        let kind = HarnessErrorKind::Walk { message, path };
        match err.into_io_error() {
            Some(io) => Self::with_source(kind, io),
            None => Self::new(kind),
        }
    }
}

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;
