use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the distfile cleanup.
#[derive(Debug, Error)]
pub enum CleanError {
    /// The distfiles root cannot be walked. Aborts the whole run.
    #[error("cannot read directory {}: {source}", path.display())]
    UnreadableDirectory { path: PathBuf, source: io::Error },

    /// Size lookup failed for a single file. The file is skipped.
    #[error("cannot stat {}: {source}", path.display())]
    UnstatableFile { path: PathBuf, source: io::Error },

    /// One file of a confirmed batch could not be removed.
    #[error("failed to remove {}: {reason}", path.display())]
    DeletionFailure { path: PathBuf, reason: String },
}

/// Failures of the portage config record store.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("{action} operation needs arguments")]
    MissingArgs { action: &'static str },

    #[error("failed to write to file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("no entries in {}", path.display())]
    Empty { path: PathBuf },
}
