//! urlgrab Core Library
//!
//! Fetches resources over HTTP(S) and keeps every outcome in a cache
//! directory, so each URL hits the network at most once.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`cache`] - URL index (`index.json`) and body blob storage
//! - [`fetch`] - Cache-or-fetch orchestration, HTTP transport, configuration
//!
//! # Cache directory layout
//!
//! ```text
//! .cache/
//! ├── index.json      {"<url>": {"cacheName": "cache-a1b2c3"}, "<url>": {"error": 1, "errorCode": 404}}
//! ├── cache-a1b2c3    raw UTF-8 body
//! └── ...
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod fetch;
mod user_agent;

// Re-export commonly used types
pub use cache::{CacheEntry, CacheIndex, HttpStatusKind, IndexError};
pub use fetch::{
    FetchError, Fetcher, FetcherConfig, HttpResponse, HttpTransport, ReqwestTransport,
    TransportError,
};
pub use user_agent::{DEFAULT_USER_AGENT, default_user_agent};
