//! Cache-or-fetch orchestration for single URLs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};

use super::config::FetcherConfig;
use super::error::FetchError;
use super::transport::{HttpTransport, ReqwestTransport};
use crate::cache::{BlobStore, CacheEntry, CacheIndex, HttpStatusKind};

/// Fetches URLs through a persistent cache directory.
///
/// A URL is requested from the network at most once per cache directory. The
/// outcome, a stored body or the failing status code, is recorded in the index
/// and every later [`fetch`](Self::fetch) of that URL is answered from it,
/// including remembered failures.
///
/// # Example
///
/// ```no_run
/// use urlgrab_core::{Fetcher, FetcherConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut fetcher = Fetcher::new(FetcherConfig::default().with_cache_path("/tmp/pages"))?;
/// let body = fetcher.fetch("https://example.com/").await?;
/// println!("{} bytes", body.len());
/// # Ok(())
/// # }
/// ```
pub struct Fetcher {
    cache_dir: PathBuf,
    index_path: PathBuf,
    index: CacheIndex,
    blobs: BlobStore,
    user_agent: String,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("cache_dir", &self.cache_dir)
            .field("index_path", &self.index_path)
            .field("entries", &self.index.len())
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl Fetcher {
    /// Creates a fetcher that uses [`ReqwestTransport`] for the network.
    ///
    /// # Errors
    ///
    /// See [`with_transport`](Self::with_transport).
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Creates a fetcher with a custom transport.
    ///
    /// Creates the cache directory (with parents) if needed and loads its index.
    /// A missing or corrupt index starts an empty cache.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidConfig`] for an invalid configuration and
    /// [`FetchError::Io`] if the cache directory cannot be created.
    pub fn with_transport(
        config: FetcherConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, FetchError> {
        config.validate()?;

        let cache_dir = config.resolve_cache_dir()?;
        fs::create_dir_all(&cache_dir).map_err(|e| FetchError::io(cache_dir.clone(), e))?;

        let index_path = cache_dir.join(&config.index_file_name);
        let index = CacheIndex::load(&index_path);
        info!(
            cache_dir = %cache_dir.display(),
            entries = index.len(),
            "cache opened"
        );

        Ok(Self {
            blobs: BlobStore::new(cache_dir.clone()),
            cache_dir,
            index_path,
            index,
            user_agent: config.user_agent,
            transport,
        })
    }

    /// Returns the body for `url`, from the cache or from the network.
    ///
    /// On a miss, one GET is sent with the configured `User-Agent`. A 2xx body
    /// must be UTF-8; it is stored as a new blob. A non-2xx status is stored as
    /// a failure. The index is saved on every call, hit or miss, and the result
    /// is then read back from the index.
    ///
    /// # Errors
    ///
    /// - [`FetchError::HttpNotFound`] / [`FetchError::HttpForbidden`] /
    ///   [`FetchError::Other`] for live or remembered error statuses
    /// - [`FetchError::Other`] for transport failures and non-UTF-8 bodies
    ///   (neither is remembered)
    /// - [`FetchError::NotProcessed`] if the index has no usable entry
    /// - [`FetchError::Storage`] / [`FetchError::Io`] for disk failures
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&mut self, url: &str) -> Result<Vec<u8>, FetchError> {
        if self.index.contains(url) {
            debug!("cache hit");
        } else {
            debug!("cache miss");
            self.fetch_into_cache(url).await?;
        }

        self.index.save(&self.index_path)?;
        self.read_entry(url)
    }

    /// Like [`fetch`](Self::fetch), returning the body as text.
    ///
    /// # Errors
    ///
    /// Same as [`fetch`](Self::fetch); additionally [`FetchError::Other`] if a
    /// blob was altered on disk and is no longer UTF-8.
    pub async fn fetch_text(&mut self, url: &str) -> Result<String, FetchError> {
        let body = self.fetch(url).await?;
        String::from_utf8(body)
            .map_err(|e| FetchError::other(url, format!("cached body is not valid UTF-8: {e}")))
    }

    /// Returns `true` if `url` already has an index entry (success or failure).
    #[must_use]
    pub fn is_cached(&self, url: &str) -> bool {
        self.index.contains(url)
    }

    /// The resolved cache directory.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the index file.
    #[must_use]
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// The in-memory index.
    #[must_use]
    pub fn index(&self) -> &CacheIndex {
        &self.index
    }

    /// Performs the network request and records its outcome in memory.
    async fn fetch_into_cache(&mut self, url: &str) -> Result<(), FetchError> {
        let headers = [("User-Agent", self.user_agent.as_str())];
        let response = self
            .transport
            .get(url, &headers)
            .await
            .map_err(|e| FetchError::transport(url, e))?;

        let entry = if response.is_success() {
            let text = String::from_utf8(response.body).map_err(|e| {
                FetchError::other(url, format!("response body is not valid UTF-8: {e}"))
            })?;
            let blob_ref = self
                .blobs
                .write(&text)
                .map_err(|e| FetchError::io(self.cache_dir.clone(), e))?;
            info!(status = response.status, blob = %blob_ref, bytes = text.len(), "stored response");
            CacheEntry::success(blob_ref)
        } else {
            info!(status = response.status, "remembering HTTP failure");
            CacheEntry::failure(response.status)
        };

        self.index.put(url, entry);
        Ok(())
    }

    /// Turns the index entry for `url` into the fetch result.
    fn read_entry(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        match self.index.get(url) {
            Some(CacheEntry::Success { blob_ref }) => self.blobs.read(blob_ref).map_err(|e| {
                FetchError::io(self.cache_dir.join(blob_ref), e)
            }),
            Some(CacheEntry::Failure { code }) => Err(match HttpStatusKind::from_status(*code) {
                HttpStatusKind::NotFound => FetchError::not_found(url),
                HttpStatusKind::Forbidden => FetchError::forbidden(url),
                HttpStatusKind::Other => FetchError::other_status(url, *code),
            }),
            Some(CacheEntry::MalformedFailure(raw)) => Err(malformed_failure(url, raw)),
            Some(CacheEntry::Unrecognized(_)) | None => Err(FetchError::not_processed(url)),
        }
    }
}

/// Error for a failure entry that carries no usable HTTP status.
fn malformed_failure(url: &str, raw: &Value) -> FetchError {
    match raw.get("errorCode") {
        Some(code) => FetchError::other(url, format!("HTTP Error: {code}")),
        None => FetchError::other(url, "cached failure without a status code"),
    }
}
