//! Defines the error types for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// The category of a problem encountered while building a tree.
///
/// Only [`ErrorKind::Critical`] ends a run; every other kind is recovered
/// locally and surfaced as an advisory event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unparseable,
    EmptyName,
    IndentationAnomaly,
    PermissionDenied,
    FilesystemError,
    Critical,
}

/// Why a single input line could not be turned into an entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line's connector prefix could not be separated from its name.
    #[error("line {line}: cannot parse '{content}'")]
    Unparseable { line: usize, content: String },

    /// Nothing usable was left after sanitization. Skipped silently.
    #[error("line {line}: entry name is empty after sanitization")]
    EmptyName { line: usize },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Unparseable { .. } => ErrorKind::Unparseable,
            ParseError::EmptyName { .. } => ErrorKind::EmptyName,
        }
    }

    /// Maps a parse failure to the event it should produce, if any.
    pub fn into_event(self) -> Option<BuildError> {
        match self {
            ParseError::Unparseable { line, content } => {
                Some(BuildError::Unparseable { line, content })
            }
            ParseError::EmptyName { .. } => None,
        }
    }
}

/// An error event emitted while materializing a tree.
///
/// All variants except [`BuildError::Critical`] are non-fatal: the run
/// reports them and continues with the next line.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("line {line}: cannot parse '{content}'")]
    Unparseable { line: usize, content: String },

    /// The entry jumped more than one level deeper than the known ancestry.
    /// One of these is emitted per synthesized stack level.
    #[error("line {line}: unusual indentation, attaching entry to the last known directory")]
    IndentationAnomaly { line: usize },

    #[error("line {line}: permission denied while creating {}", path.display())]
    PermissionDenied { line: usize, path: PathBuf },

    #[error("line {line}: failed to create {}: {source}", path.display())]
    Filesystem {
        line: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A failure outside per-line handling. Ends the run.
    #[error("critical error: {0}")]
    Critical(String),
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::Unparseable { .. } => ErrorKind::Unparseable,
            BuildError::IndentationAnomaly { .. } => ErrorKind::IndentationAnomaly,
            BuildError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            BuildError::Filesystem { .. } => ErrorKind::FilesystemError,
            BuildError::Critical(_) => ErrorKind::Critical,
        }
    }

    /// The 1-based source line this error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            BuildError::Unparseable { line, .. }
            | BuildError::IndentationAnomaly { line }
            | BuildError::PermissionDenied { line, .. }
            | BuildError::Filesystem { line, .. } => Some(*line),
            BuildError::Critical(_) => None,
        }
    }

    /// Classifies an I/O failure for the entry at `path`.
    pub(crate) fn from_io(line: usize, path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            BuildError::PermissionDenied { line, path }
        } else {
            BuildError::Filesystem { line, path, source }
        }
    }
}

/// The primary error type for failures that abort a run.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Represents an I/O error, typically from file system operations.
    #[error("I/O error for path {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Represents an error that occurred when a Tokio task was joined.
    /// This is often due to a task panicking or being cancelled.
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}
