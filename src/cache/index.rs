//! The URL -> [`CacheEntry`] index and its `index.json` persistence.
//!
//! # Consistency model
//!
//! [`CacheIndex::save`] is read-merge-write: it re-reads the file, overlays
//! every in-memory entry (in-memory wins per URL) and writes the union back.
//! Two processes saving one after the other merge cleanly. Two processes that
//! interleave between their own read and write can lose each other's update to
//! the same URL; the last write wins. There is no file locking.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::entry::CacheEntry;
use super::error::IndexError;

/// In-memory cache index, loaded from and saved to a single JSON file.
#[derive(Debug, Clone, Default)]
pub struct CacheIndex {
    entries: BTreeMap<String, CacheEntry>,
}

impl CacheIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the index stored at `path`.
    ///
    /// A missing file, an unreadable file, invalid JSON or a JSON document that
    /// is not an object all yield an empty index. This never fails.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let entries: BTreeMap<String, CacheEntry> = read_index_file(path)
            .into_iter()
            .map(|(url, value)| (url, CacheEntry::from_value(value)))
            .collect();
        debug!(path = %path.display(), entries = entries.len(), "loaded cache index");
        Self { entries }
    }

    /// Looks up the entry for `url`.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<&CacheEntry> {
        self.entries.get(url)
    }

    /// Records `entry` for `url`, replacing any previous entry.
    pub fn put(&mut self, url: impl Into<String>, entry: CacheEntry) {
        self.entries.insert(url.into(), entry);
    }

    /// Returns `true` if `url` has an entry.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Number of URLs in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the index holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(url, entry)` pairs in URL order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CacheEntry)> {
        self.entries.iter().map(|(url, entry)| (url.as_str(), entry))
    }

    /// Merges this index into the file at `path`.
    ///
    /// The file is re-read first (missing or unparseable counts as empty), every
    /// in-memory entry is laid over it, and the result replaces the file via a
    /// temporary file in the same directory. Entries on disk that this index
    /// does not hold are kept.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if the merged index cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        let mut merged = read_index_file(path);
        let on_disk = merged.len();
        for (url, entry) in &self.entries {
            merged.insert(url.clone(), entry.to_value());
        }

        let encoded = serde_json::to_vec(&Value::Object(merged))
            .map_err(|e| IndexError::serialize(path, e))?;
        write_replacing(path, &encoded)?;

        debug!(
            path = %path.display(),
            on_disk,
            in_memory = self.entries.len(),
            "saved cache index"
        );
        Ok(())
    }
}

/// Reads the index file as a JSON object, degrading every failure to empty.
fn read_index_file(path: &Path) -> Map<String, Value> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Map::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cache index unreadable, treating as empty");
            return Map::new();
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!(path = %path.display(), "cache index is not a JSON object, treating as empty");
            Map::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cache index is corrupt, treating as empty");
            Map::new()
        }
    }
}

/// Writes `bytes` to a sibling temp file, then renames it over `path`.
fn write_replacing(path: &Path, bytes: &[u8]) -> Result<(), IndexError> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = tempfile::Builder::new()
        .prefix(".index-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| IndexError::io(path, e))?;
    temp.write_all(bytes)
        .map_err(|e| IndexError::io(path, e))?;
    temp.flush().map_err(|e| IndexError::io(path, e))?;
    // The temp file starts out private; keep the mode of the file it replaces.
    if let Some(existing) = fs::metadata(path).ok().filter(fs::Metadata::is_file) {
        temp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| IndexError::io(path, e))?;
    }
    temp.persist(path)
        .map_err(|e| IndexError::io(path, e.error))?;
    Ok(())
}
