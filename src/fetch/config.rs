//! Fetcher configuration with documented defaults.

use std::path::{Component, Path, PathBuf};

use super::error::FetchError;
use crate::user_agent::default_user_agent;

/// Default cache directory name, created under the current directory.
pub const DEFAULT_CACHE_DIR_NAME: &str = ".cache";

/// Default index file name inside the cache directory.
pub const DEFAULT_INDEX_FILE_NAME: &str = "index.json";

/// Configuration for a [`Fetcher`](super::Fetcher).
///
/// | field | default |
/// |---|---|
/// | `cache_path` | `None`: use `<cwd>/<cache_dir_name>` |
/// | `cache_dir_name` | `.cache` |
/// | `index_file_name` | `index.json` |
/// | `user_agent` | [`DEFAULT_USER_AGENT`](crate::DEFAULT_USER_AGENT) |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    /// Explicit cache directory. Overrides `cache_dir_name` when set.
    pub cache_path: Option<PathBuf>,
    /// Directory name under the current directory, used when `cache_path` is unset.
    pub cache_dir_name: String,
    /// Index file name inside the cache directory.
    pub index_file_name: String,
    /// Value of the `User-Agent` request header.
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            cache_path: None,
            cache_dir_name: DEFAULT_CACHE_DIR_NAME.to_string(),
            index_file_name: DEFAULT_INDEX_FILE_NAME.to_string(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetcherConfig {
    /// Sets an explicit cache directory.
    #[must_use]
    pub fn with_cache_path(mut self, cache_path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(cache_path.into());
        self
    }

    /// Sets the directory name used under the current directory.
    #[must_use]
    pub fn with_cache_dir_name(mut self, name: impl Into<String>) -> Self {
        self.cache_dir_name = name.into();
        self
    }

    /// Sets the index file name.
    #[must_use]
    pub fn with_index_file_name(mut self, name: impl Into<String>) -> Self {
        self.index_file_name = name.into();
        self
    }

    /// Sets the `User-Agent` header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validates field contents.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidConfig`] if a name is empty or not a single
    /// path component, or if the User-Agent is not a valid header value.
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.cache_path.is_none() {
            validate_file_name("cache_dir_name", &self.cache_dir_name)?;
        }
        validate_file_name("index_file_name", &self.index_file_name)?;

        if self.user_agent.trim().is_empty() {
            return Err(FetchError::invalid_config(
                "user_agent",
                "must not be empty",
            ));
        }
        if reqwest::header::HeaderValue::from_str(&self.user_agent).is_err() {
            return Err(FetchError::invalid_config(
                "user_agent",
                "contains characters not allowed in an HTTP header",
            ));
        }
        Ok(())
    }

    /// Returns the cache directory for a given working directory.
    #[must_use]
    pub fn cache_dir_in(&self, cwd: &Path) -> PathBuf {
        match &self.cache_path {
            Some(path) => path.clone(),
            None => cwd.join(&self.cache_dir_name),
        }
    }

    /// Returns the cache directory, resolving relative to the process working
    /// directory when `cache_path` is unset.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Io`] if the working directory cannot be determined.
    pub fn resolve_cache_dir(&self) -> Result<PathBuf, FetchError> {
        if let Some(path) = &self.cache_path {
            return Ok(path.clone());
        }
        let cwd = std::env::current_dir().map_err(|e| FetchError::io(".", e))?;
        Ok(self.cache_dir_in(&cwd))
    }
}

fn validate_file_name(field: &'static str, value: &str) -> Result<(), FetchError> {
    if value.is_empty() {
        return Err(FetchError::invalid_config(field, "must not be empty"));
    }
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(FetchError::invalid_config(
            field,
            format!("must be a single file name, got {value:?}"),
        )),
    }
}
