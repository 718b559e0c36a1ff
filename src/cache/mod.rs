//! On-disk cache: the URL index and the body blobs it points to.
//!
//! A cache directory holds one index file (default `index.json`) mapping each
//! URL to a [`CacheEntry`], plus one `cache-XXXXXX` blob per successfully
//! fetched body.

mod blob;
mod entry;
mod error;
mod index;

pub use blob::{BLOB_PREFIX, BlobStore};
pub use entry::{CacheEntry, HTTP_ERROR_SENTINEL, HttpStatusKind};
pub use error::IndexError;
pub use index::CacheIndex;
