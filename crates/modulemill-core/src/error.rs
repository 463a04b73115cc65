//! Engine error types.
//!
//! Lint problems are never errors here; they are [`crate::report::Finding`]s.
//! This enum only covers direct-use failures such as section extraction and
//! unreadable files.

use std::path::PathBuf;

/// Errors that can occur outside of the lint report.
#[derive(Debug, thiserror::Error)]
pub enum MillError {
    /// No heading title starts with the requested prefix.
    #[error("section not found: '{prefix}'")]
    SectionNotFound { prefix: String },

    /// A document or manifest could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, MillError>;

/// Read a file as UTF-8, replacing invalid sequences.
pub fn read_text(path: &std::path::Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| MillError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
