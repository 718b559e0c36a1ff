//! Error types for cache index persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while persisting the cache index.
///
/// Loading never produces these; an unreadable index degrades to an empty one.
#[derive(Debug, Error)]
pub enum IndexError {
    /// File system error while writing the index (disk full, permissions, ...).
    #[error("IO error writing cache index {path}: {source}")]
    Io {
        /// The index file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The merged index could not be encoded as JSON.
    #[error("failed to encode cache index {path}: {source}")]
    Serialize {
        /// The index file path.
        path: PathBuf,
        /// The underlying encoding error.
        #[source]
        source: serde_json::Error,
    },
}

impl IndexError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an encoding error.
    pub fn serialize(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Serialize {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_error_io_display_contains_path() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = IndexError::io(PathBuf::from("/tmp/cache/index.json"), io_error);
        let msg = error.to_string();
        assert!(msg.contains("/tmp/cache/index.json"), "Expected path in: {msg}");
        assert!(msg.contains("access denied"), "Expected cause in: {msg}");
    }
}
