//! Error types for the extraction layer
//!
//! Only run-aborting conditions live here. Per-file extraction problems
//! are data (`ExtractionFailure`), not errors.

use std::path::PathBuf;

/// Errors that abort an ingest run
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Docs root does not exist or is not a directory
    #[error("docs root not found: {0}")]
    DocsRootNotFound(PathBuf),

    /// IO error reading a required file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Inventory file is not valid JSON
    #[error("invalid inventory {path}: {message}")]
    InvalidInventory { path: PathBuf, message: String },

    /// Inventory file contained no records
    #[error("inventory {0} contains no records")]
    EmptyInventory(PathBuf),
}

impl IngestError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display_includes_path() {
        let err = IngestError::io_error(
            "/docs/missing.yml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/docs/missing.yml"));
    }
}
