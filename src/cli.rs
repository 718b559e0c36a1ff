//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use urlgrab_core::FetcherConfig;
use urlgrab_core::fetch::{DEFAULT_CACHE_DIR_NAME, DEFAULT_INDEX_FILE_NAME};

/// Fetch URLs over HTTP with a persistent on-disk cache.
///
/// Each URL is downloaded at most once; bodies and HTTP failures are
/// remembered in the cache directory and served from there afterwards.
/// Bodies are written to stdout in argument order.
#[derive(Parser, Debug)]
#[command(name = "urlgrab")]
#[command(author, version, about)]
pub struct Args {
    /// URLs to fetch (read from stdin, one per line, when omitted)
    pub urls: Vec<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Cache directory (default: <cwd>/<cache-dir-name>)
    #[arg(short = 'p', long)]
    pub cache_path: Option<PathBuf>,

    /// Cache directory name under the current directory
    #[arg(long, default_value = DEFAULT_CACHE_DIR_NAME)]
    pub cache_dir_name: String,

    /// Index file name inside the cache directory
    #[arg(long, default_value = DEFAULT_INDEX_FILE_NAME)]
    pub index_file: String,

    /// User-Agent header sent with requests (default: desktop Safari)
    #[arg(short = 'A', long)]
    pub user_agent: Option<String>,
}

impl Args {
    /// Builds the fetcher configuration from the parsed flags.
    pub fn fetcher_config(&self) -> FetcherConfig {
        let mut config = FetcherConfig::default()
            .with_cache_dir_name(self.cache_dir_name.clone())
            .with_index_file_name(self.index_file.clone());
        if let Some(path) = &self.cache_path {
            config = config.with_cache_path(path.clone());
        }
        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent.clone());
        }
        config
    }
}
