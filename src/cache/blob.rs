//! Write-once blob files holding fetched bodies.

use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tracing::debug;

/// Prefix of every blob file name.
pub const BLOB_PREFIX: &str = "cache-";

/// Length of the random suffix after [`BLOB_PREFIX`].
const BLOB_SUFFIX_LEN: usize = 6;

/// Stores and reads body blobs inside a cache directory.
///
/// Blob names are allocated exclusively (`cache-XXXXXX`), so a new blob never
/// overwrites an existing file. Blobs are never modified or removed.
#[derive(Debug, Clone)]
pub struct BlobStore {
    dir: PathBuf,
}

impl BlobStore {
    /// Creates a store rooted at `dir`. The directory must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the blobs.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `text` to a newly allocated blob and returns its file name.
    ///
    /// The blob is only kept once every byte has been written; on error the
    /// partial file is removed.
    ///
    /// # Errors
    ///
    /// Returns the IO error from creating, writing or keeping the file.
    pub fn write(&self, text: &str) -> io::Result<String> {
        let mut temp = tempfile::Builder::new()
            .prefix(BLOB_PREFIX)
            .rand_bytes(BLOB_SUFFIX_LEN)
            .tempfile_in(&self.dir)?;
        temp.write_all(text.as_bytes())?;
        temp.flush()?;

        let (_file, path) = temp.keep().map_err(|e| e.error)?;
        let blob_ref = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| io::Error::other("blob path has no file name"))?;
        debug!(blob = %blob_ref, bytes = text.len(), "wrote blob");
        Ok(blob_ref)
    }

    /// Resolves `blob_ref` to a path inside the store.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] if `blob_ref` is not a single
    /// plain file name (e.g. contains `..` or a separator).
    pub fn path_of(&self, blob_ref: &str) -> io::Result<PathBuf> {
        let mut components = Path::new(blob_ref).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.dir.join(blob_ref)),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("blob reference is not a plain file name: {blob_ref:?}"),
            )),
        }
    }

    /// Reads the full contents of a blob.
    ///
    /// # Errors
    ///
    /// Returns the IO error if the reference is invalid or the file cannot be read.
    pub fn read(&self, blob_ref: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path_of(blob_ref)?)
    }
}
