//! Cache entry types and their `index.json` representation.
//!
//! Each URL in the index maps to one of:
//! - `{"cacheName": "<blob file name>"}` for a stored body
//! - `{"error": 1, "errorCode": <status>}` for a remembered HTTP failure
//!
//! Any other object with an `error` field is still a remembered failure, just
//! not one this version can classify.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel stored in the `error` field of a failure entry, meaning "HTTP error".
pub const HTTP_ERROR_SENTINEL: u8 = 1;

/// Classification of a remembered HTTP failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatusKind {
    /// HTTP 404.
    NotFound,
    /// HTTP 403.
    Forbidden,
    /// Any other non-success status.
    Other,
}

impl HttpStatusKind {
    /// Classifies an HTTP status code.
    #[must_use]
    pub fn from_status(code: u16) -> Self {
        match code {
            404 => Self::NotFound,
            403 => Self::Forbidden,
            _ => Self::Other,
        }
    }

    /// Returns the lowercase label used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for HttpStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The remembered outcome of fetching one URL.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    /// The body was stored in the blob file `blob_ref` inside the cache directory.
    Success {
        /// File name of the blob, relative to the cache directory.
        blob_ref: String,
    },
    /// The server answered with a non-success status; no body was stored.
    ///
    /// The classification is derived from `code`, see [`CacheEntry::failure_kind`].
    Failure {
        /// The HTTP status code.
        code: u16,
    },
    /// An entry with an `error` field that is not a well-formed HTTP failure
    /// (another sentinel, or a missing or out-of-range `errorCode`).
    ///
    /// Kept verbatim. Served as an unclassified failure.
    MalformedFailure(Value),
    /// An index entry with neither an `error` nor a `cacheName` field.
    ///
    /// Kept verbatim so saving the index does not destroy it. Looking up a URL
    /// with such an entry is a cache hit that cannot be served.
    Unrecognized(Value),
}

/// On-disk shape of an entry. Failure is tried first: an entry carrying an
/// `error` field is a failure even if it also names a blob.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Failure {
        error: u8,
        #[serde(rename = "errorCode")]
        error_code: u16,
    },
    Success {
        #[serde(rename = "cacheName")]
        cache_name: String,
    },
}

impl CacheEntry {
    /// Creates a success entry for a stored blob.
    pub fn success(blob_ref: impl Into<String>) -> Self {
        Self::Success {
            blob_ref: blob_ref.into(),
        }
    }

    /// Creates a failure entry for an HTTP status code.
    #[must_use]
    pub fn failure(code: u16) -> Self {
        Self::Failure { code }
    }

    /// Classification of a failure entry, `None` for anything else.
    ///
    /// A [`CacheEntry::MalformedFailure`] is always [`HttpStatusKind::Other`].
    #[must_use]
    pub fn failure_kind(&self) -> Option<HttpStatusKind> {
        match self {
            Self::Failure { code } => Some(HttpStatusKind::from_status(*code)),
            Self::MalformedFailure(_) => Some(HttpStatusKind::Other),
            Self::Success { .. } | Self::Unrecognized(_) => None,
        }
    }

    /// Decodes an entry from its JSON value. Never fails: an object with an
    /// `error` field that is not a well-formed failure becomes
    /// [`CacheEntry::MalformedFailure`], anything else that is not a known
    /// shape becomes [`CacheEntry::Unrecognized`].
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let has_error = value.get("error").is_some();
        match serde_json::from_value::<StoredEntry>(value.clone()) {
            Ok(StoredEntry::Failure { error, error_code }) if error == HTTP_ERROR_SENTINEL => {
                Self::failure(error_code)
            }
            Ok(StoredEntry::Success { cache_name }) if !has_error => Self::Success {
                blob_ref: cache_name,
            },
            _ if has_error => Self::MalformedFailure(value),
            _ => Self::Unrecognized(value),
        }
    }

    /// Encodes the entry as the JSON value written to `index.json`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let stored = match self {
            Self::Success { blob_ref } => StoredEntry::Success {
                cache_name: blob_ref.clone(),
            },
            Self::Failure { code } => StoredEntry::Failure {
                error: HTTP_ERROR_SENTINEL,
                error_code: *code,
            },
            Self::MalformedFailure(value) | Self::Unrecognized(value) => return value.clone(),
        };
        // StoredEntry only holds strings and integers, which always serialize.
        serde_json::to_value(stored).unwrap_or(Value::Null)
    }

    /// Returns `true` for a success entry.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_status_kind_from_status() {
        assert_eq!(HttpStatusKind::from_status(404), HttpStatusKind::NotFound);
        assert_eq!(HttpStatusKind::from_status(403), HttpStatusKind::Forbidden);
        assert_eq!(HttpStatusKind::from_status(500), HttpStatusKind::Other);
        assert_eq!(HttpStatusKind::from_status(401), HttpStatusKind::Other);
    }

    #[test]
    fn test_success_entry_wire_shape() {
        let entry = CacheEntry::success("cache-abc123");
        assert_eq!(entry.to_value(), json!({"cacheName": "cache-abc123"}));
    }

    #[test]
    fn test_failure_entry_wire_shape() {
        let entry = CacheEntry::failure(404);
        assert_eq!(entry.to_value(), json!({"error": 1, "errorCode": 404}));
    }

    #[test]
    fn test_from_value_decodes_success() {
        let entry = CacheEntry::from_value(json!({"cacheName": "cache-x1y2z3"}));
        assert_eq!(entry, CacheEntry::success("cache-x1y2z3"));
        assert!(entry.is_success());
    }

    #[test]
    fn test_from_value_decodes_failure_with_kind() {
        let entry = CacheEntry::from_value(json!({"error": 1, "errorCode": 403}));
        assert_eq!(entry, CacheEntry::Failure { code: 403 });
        assert_eq!(entry.failure_kind(), Some(HttpStatusKind::Forbidden));
        assert!(!entry.is_success());
    }

    #[test]
    fn test_failure_kind_follows_code_through_the_wire_format() {
        let entry = CacheEntry::failure(404);
        assert_eq!(entry.failure_kind(), Some(HttpStatusKind::NotFound));

        let reloaded = CacheEntry::from_value(entry.to_value());
        assert_eq!(reloaded, entry);
        assert_eq!(reloaded.failure_kind(), Some(HttpStatusKind::NotFound));

        assert_eq!(CacheEntry::failure(500).failure_kind(), Some(HttpStatusKind::Other));
        assert_eq!(CacheEntry::success("cache-abc123").failure_kind(), None);
    }

    #[test]
    fn test_from_value_error_field_takes_precedence() {
        let entry =
            CacheEntry::from_value(json!({"error": 1, "errorCode": 500, "cacheName": "cache-a"}));
        assert_eq!(entry, CacheEntry::failure(500));
    }

    #[test]
    fn test_from_value_any_error_field_is_a_failure() {
        for raw in [
            json!({"error": 7, "errorCode": 404}),
            json!({"error": 0, "errorCode": 500}),
            json!({"error": 1, "errorCode": 70000}),
            json!({"error": 1}),
            json!({"error": "timeout", "cacheName": "cache-abc123"}),
        ] {
            let entry = CacheEntry::from_value(raw.clone());
            assert_eq!(entry, CacheEntry::MalformedFailure(raw.clone()));
            assert_eq!(entry.failure_kind(), Some(HttpStatusKind::Other));
            assert_eq!(entry.to_value(), raw);
        }
    }

    #[test]
    fn test_from_value_unknown_shape_is_preserved_verbatim() {
        let raw = json!({"etag": "W/\"1\"", "note": ["x"]});
        let entry = CacheEntry::from_value(raw.clone());
        assert_eq!(entry, CacheEntry::Unrecognized(raw.clone()));
        assert_eq!(entry.failure_kind(), None);
        assert_eq!(entry.to_value(), raw);
    }

    #[test]
    fn test_from_value_non_object_is_unrecognized() {
        let entry = CacheEntry::from_value(json!("cache-abc"));
        assert!(matches!(entry, CacheEntry::Unrecognized(_)));
    }
}
