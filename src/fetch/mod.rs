//! Cache-or-fetch for single URLs.
//!
//! # Flow
//!
//! 1. Look the URL up in the cache index.
//! 2. On a miss, GET it once and record either the stored body or the failing
//!    status code.
//! 3. Save the index (always, hit or miss).
//! 4. Answer from the index entry: body bytes, or the matching [`FetchError`].
//!
//! No retries: a failure recorded once is returned on every later call until
//! the index is cleared by hand.

mod config;
mod error;
mod fetcher;
mod transport;

pub use config::{DEFAULT_CACHE_DIR_NAME, DEFAULT_INDEX_FILE_NAME, FetcherConfig};
pub use error::FetchError;
pub use fetcher::Fetcher;
pub use transport::{
    CONNECT_TIMEOUT_SECS, HttpResponse, HttpTransport, READ_TIMEOUT_SECS, ReqwestTransport,
    TransportError,
};

// Note: Per project convention, we do NOT define module-local Result aliases.
// Use `Result<T, FetchError>` explicitly in function signatures.
