//! Shared HTTP session for search and download requests.
//!
//! A [`Session`] is one `reqwest` client plus the cookie jar it writes to.
//! Search hands its session to every candidate so cookies SubHD assigns during
//! search are replayed when the detail page is fetched.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder, Proxy};
use thiserror::Error;
use tracing::warn;

/// Default connect timeout for every request (10 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default total timeout for one search request (10 seconds).
pub const SEARCH_TIMEOUT_SECS: u64 = 10;

/// Default total timeout for the final archive fetch (5 minutes).
pub const FETCH_TIMEOUT_SECS: u64 = 300;

/// Browser User-Agent; SubHD serves a stripped page to unknown agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_ZH: &str = "zh-CN,zh;q=0.9,en;q=0.8";

/// Timeout policy for the request kinds the crate issues.
///
/// Detail-page and token-exchange requests only carry the connect timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    /// TCP/TLS connect timeout applied to every request.
    pub connect_timeout: Duration,
    /// Total timeout for each search-page request.
    pub search_timeout: Duration,
    /// Total timeout for the streamed archive fetch.
    pub fetch_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            search_timeout: Duration::from_secs(SEARCH_TIMEOUT_SECS),
            fetch_timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
        }
    }
}

/// Errors raised while building a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The underlying client builder rejected the configuration.
    #[error("HTTP client construction failed: {source}\n  Suggestion: Check proxy environment variables")]
    Build {
        #[source]
        source: reqwest::Error,
    },

    /// System proxy lookup panicked on both attempts.
    #[error(
        "HTTP client construction panicked while reading proxy settings\n  Suggestion: Set HTTP_PROXY/HTTPS_PROXY explicitly or unset them"
    )]
    Panicked,
}

/// HTTP client with a shared cookie jar and browser-like default headers.
///
/// Cloning is cheap and every clone shares the same jar.
#[derive(Clone)]
pub struct Session {
    client: Client,
    jar: Arc<Jar>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session with a fresh cookie jar.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the HTTP client cannot be constructed.
    pub fn new(connect_timeout: Duration) -> Result<Self, SessionError> {
        Self::with_cookie_jar(Arc::new(Jar::default()), connect_timeout)
    }

    /// Creates a session that reads and writes an existing cookie jar.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the HTTP client cannot be constructed.
    pub fn with_cookie_jar(jar: Arc<Jar>, connect_timeout: Duration) -> Result<Self, SessionError> {
        let client = match try_build_client(Arc::clone(&jar), connect_timeout, false) {
            Ok(client) => client,
            Err(BuildClientFailure::Panic) => {
                // Restricted sandboxes can panic while querying system proxy
                // settings; retry with env-only proxy discovery.
                warn!("session client hit system proxy panic; using env-proxy fallback builder");
                match try_build_client(Arc::clone(&jar), connect_timeout, true) {
                    Ok(client) => client,
                    Err(BuildClientFailure::Panic) => return Err(SessionError::Panicked),
                    Err(BuildClientFailure::Build(source)) => {
                        return Err(SessionError::Build { source });
                    }
                }
            }
            Err(BuildClientFailure::Build(source)) => return Err(SessionError::Build { source }),
        };
        Ok(Self { client, jar })
    }

    /// Underlying `reqwest` client.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Cookie jar shared by every clone of this session.
    #[must_use]
    pub fn cookie_jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

fn try_build_client(
    jar: Arc<Jar>,
    connect_timeout: Duration,
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure> {
    catch_unwind(AssertUnwindSafe(move || {
        let mut builder = base_builder(jar, connect_timeout);
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn base_builder(jar: Arc<Jar>, connect_timeout: Duration) -> ClientBuilder {
    Client::builder()
        .connect_timeout(connect_timeout)
        .user_agent(BROWSER_USER_AGENT)
        .default_headers(default_headers())
        .cookie_provider(jar)
        .gzip(true)
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_ZH));
    headers
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    if let Some(proxy) = env_proxy_for_scheme("https")
        && let Ok(resolved) = Proxy::https(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    if let Some(proxy) = env_proxy_for_scheme("http")
        && let Ok(resolved) = Proxy::http(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

fn env_proxy_for_scheme(scheme: &str) -> Option<String> {
    match scheme {
        "https" => find_first_proxy_var(&["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"]),
        "http" => find_first_proxy_var(&["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"]),
        _ => None,
    }
}

fn find_first_proxy_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_http_settings_defaults() {
        let settings = HttpSettings::default();
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
        assert_eq!(settings.search_timeout, Duration::from_secs(10));
        assert_eq!(settings.fetch_timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_session_clones_share_cookie_jar() {
        let session = Session::new(Duration::from_secs(5)).unwrap();
        let clone = session.clone();
        assert!(Arc::ptr_eq(&session.cookie_jar(), &clone.cookie_jar()));
    }

    #[test]
    fn test_session_debug_hides_internals() {
        let session = Session::new(Duration::from_secs(5)).unwrap();
        assert_eq!(format!("{session:?}"), "Session { .. }");
    }

    #[test]
    fn test_unknown_proxy_scheme_is_ignored() {
        assert!(env_proxy_for_scheme("ftp").is_none());
    }

    #[test]
    fn test_browser_user_agent_looks_like_browser() {
        assert!(BROWSER_USER_AGENT.starts_with("Mozilla/5.0"));
    }
}
