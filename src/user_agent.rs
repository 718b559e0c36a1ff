//! Default User-Agent sent with every fetch.
//!
//! Some servers refuse obvious bot traffic, so the default mimics a desktop
//! Safari. Callers can override it through [`FetcherConfig::user_agent`].
//!
//! [`FetcherConfig::user_agent`]: crate::fetch::FetcherConfig::user_agent

/// Desktop browser User-Agent used when none is configured.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_1) \
    AppleWebKit/537.73.11 (KHTML, like Gecko) Version/7.0.1 Safari/537.73.11";

/// Returns the default User-Agent as an owned string.
#[must_use]
pub fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
