//! Boot-trace error types.

use std::path::PathBuf;

use modulemill_core::MillError;

/// Failures that stop a trace before any check runs.
#[derive(Debug, thiserror::Error)]
pub enum BootError {
    /// One or more of the three input files does not exist.
    #[error("missing file: {}", display_paths(.0))]
    MissingInputs(Vec<PathBuf>),

    #[error(transparent)]
    Read(#[from] MillError),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for boot-trace operations.
pub type Result<T> = std::result::Result<T, BootError>;
