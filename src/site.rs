//! Site-specific constants for SubHD.
//!
//! Everything that must match the remote site byte-for-byte (paths, marker
//! strings, the display prefix) lives here so the search and resolver modules
//! stay free of literals.

use url::Url;

/// Production SubHD origin.
pub const DEFAULT_BASE_URL: &str = "http://subhd.la";

/// Short source name used in logs and CLI output.
pub const SOURCE_NAME: &str = "subhd";

/// Prefix attached to every candidate display name.
pub const CHOICE_PREFIX: &str = "[SUBHD]";

/// Path segment the free-text query is appended to.
pub(crate) const SEARCH_SEGMENT: &str = "search";

/// Legacy token-exchange endpoint.
pub(crate) const DOWNLOAD_AJAX_PATH: &str = "ajax/down_ajax";

/// Summary text SubHD renders when a query has no hits.
pub(crate) const ZERO_RESULTS_MARKER: &str = "总共 0 条";

/// Body text returned when the query path contains characters SubHD rejects.
pub const DISALLOWED_CHARS_MARKER: &str = "The URI you submitted has disallowed characters";

/// Location of the SubHD deployment being talked to.
///
/// The default points at the production site; tests and mirror users override
/// the origin with [`SiteConfig::with_base_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteConfig {
    /// Creates a config for the production site.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a config for a custom origin (mirror or mock server).
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Origin without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds `{base}/search/{query}` with the query as one encoded path segment.
    ///
    /// Returns `None` when the base URL cannot carry a path.
    #[must_use]
    pub fn search_url(&self, query: &str) -> Option<Url> {
        let mut url = Url::parse(&self.base_url).ok()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .push(SEARCH_SEGMENT)
            .push(query);
        Some(url)
    }

    /// Resolves a result-row href against the site origin.
    #[must_use]
    pub fn detail_url(&self, href: &str) -> String {
        let href = href.trim();
        if href.starts_with("http://") || href.starts_with("https://") {
            return href.to_string();
        }
        Url::parse(&self.base_url)
            .and_then(|base| base.join(href))
            .map_or_else(
                |_| format!("{}/{}", self.base_url, href.trim_start_matches('/')),
                |url| url.to_string(),
            )
    }

    /// Absolute URL of the token-exchange endpoint.
    #[must_use]
    pub fn download_ajax_url(&self) -> String {
        format!("{}/{DOWNLOAD_AJAX_PATH}", self.base_url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_site_config_default_points_at_production() {
        assert_eq!(SiteConfig::default().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_site_config_trims_trailing_slash() {
        let site = SiteConfig::with_base_url("http://mirror.example/ ");
        assert_eq!(site.base_url(), "http://mirror.example");
    }

    #[test]
    fn test_search_url_encodes_query_as_single_segment() {
        let site = SiteConfig::with_base_url("http://subhd.example");
        let url = site.search_url("the matrix 1999").unwrap();
        assert_eq!(url.path(), "/search/the%20matrix%201999");
    }

    #[test]
    fn test_search_url_escapes_slash_in_query() {
        let site = SiteConfig::with_base_url("http://subhd.example");
        let url = site.search_url("AC/DC").unwrap();
        assert_eq!(url.path(), "/search/AC%2FDC");
    }

    #[test]
    fn test_search_url_rejects_unparseable_base() {
        let site = SiteConfig::with_base_url("not a url");
        assert!(site.search_url("x").is_none());
    }

    #[test]
    fn test_detail_url_joins_relative_href() {
        let site = SiteConfig::with_base_url("http://subhd.example");
        assert_eq!(site.detail_url("/a/312224"), "http://subhd.example/a/312224");
    }

    #[test]
    fn test_detail_url_keeps_absolute_href() {
        let site = SiteConfig::with_base_url("http://subhd.example");
        assert_eq!(
            site.detail_url("https://cdn.example/a/1"),
            "https://cdn.example/a/1"
        );
    }

    #[test]
    fn test_download_ajax_url() {
        let site = SiteConfig::with_base_url("http://subhd.example/");
        assert_eq!(
            site.download_ajax_url(),
            "http://subhd.example/ajax/down_ajax"
        );
    }
}
