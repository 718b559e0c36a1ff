//! Error types for the fetch module.

use std::path::PathBuf;

use thiserror::Error;

use super::transport::TransportError;
use crate::cache::IndexError;

/// Errors returned by [`Fetcher`](super::Fetcher).
///
/// `HttpNotFound`, `HttpForbidden` and `Other` come from a live response or a
/// remembered one; the two are indistinguishable to the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered 404.
    #[error("HTTP 404 not found: {url}")]
    HttpNotFound {
        /// The requested URL.
        url: String,
    },

    /// The server answered 403.
    #[error("HTTP 403 forbidden: {url}")]
    HttpForbidden {
        /// The requested URL.
        url: String,
    },

    /// Any other non-success status, or a transport failure.
    #[error("{message} ({url})")]
    Other {
        /// The requested URL.
        url: String,
        /// The HTTP status code, when the server answered at all.
        status: Option<u16>,
        /// Human-readable description; contains the status code when known.
        message: String,
        /// The transport error, for failures that never produced a response.
        #[source]
        source: Option<TransportError>,
    },

    /// The index holds no usable entry for the URL after the fetch attempt.
    #[error("URL was not processed: {url}")]
    NotProcessed {
        /// The requested URL.
        url: String,
    },

    /// The cache index could not be saved.
    #[error(transparent)]
    Storage(#[from] IndexError),

    /// File system error on the cache directory or a blob.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A [`FetcherConfig`](super::FetcherConfig) field is unusable.
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl FetchError {
    /// Creates a 404 error.
    pub fn not_found(url: impl Into<String>) -> Self {
        Self::HttpNotFound { url: url.into() }
    }

    /// Creates a 403 error.
    pub fn forbidden(url: impl Into<String>) -> Self {
        Self::HttpForbidden { url: url.into() }
    }

    /// Creates an error for a non-success status other than 403/404.
    pub fn other_status(url: impl Into<String>, status: u16) -> Self {
        Self::Other {
            url: url.into(),
            status: Some(status),
            message: format!("HTTP Error: {status}"),
            source: None,
        }
    }

    /// Creates an error for a request that never produced a usable response.
    pub fn transport(url: impl Into<String>, source: TransportError) -> Self {
        Self::Other {
            url: url.into(),
            status: None,
            message: format!("transport error: {source}"),
            source: Some(source),
        }
    }

    /// Creates an error carrying only a description.
    pub fn other(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Other {
            url: url.into(),
            status: None,
            message: message.into(),
            source: None,
        }
    }

    /// Creates the error signalling a URL with no usable index entry.
    pub fn not_processed(url: impl Into<String>) -> Self {
        Self::NotProcessed { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a configuration error.
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Returns the HTTP status behind this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpNotFound { .. } => Some(404),
            Self::HttpForbidden { .. } => Some(403),
            Self::Other { status, .. } => *status,
            _ => None,
        }
    }
}
