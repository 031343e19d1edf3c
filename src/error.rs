use std::path::PathBuf;
use thiserror::Error;

/// Conditions that abort a usage computation. Everything below the file level is
/// skipped instead of surfacing here.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("Claude projects directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),
}
