//! Error types for search operations.
//!
//! A rejected query or an empty result page is not an error; these variants
//! cover transport failures that stop the search loop.

use thiserror::Error;

/// Errors that can occur while querying the search endpoint.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The search URL could not be built from the configured origin.
    #[error("invalid search URL for query '{query}' on '{base_url}'\n  Suggestion: Check the configured base_url")]
    InvalidUrl {
        /// The query being searched.
        query: String,
        /// The configured origin.
        base_url: String,
    },

    /// The search request did not complete within the search timeout.
    #[error("search timed out for query '{query}'\n  Suggestion: The site may be slow; retry or raise search_timeout_secs")]
    Timeout {
        /// The query being searched.
        query: String,
    },

    /// Network-level failure (DNS, connection refused, TLS, body read).
    #[error("network error searching '{query}': {source}\n  Suggestion: Check network connectivity to the subtitle site")]
    Network {
        /// The query being searched.
        query: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The search endpoint answered with a non-success status.
    #[error("HTTP {status} searching '{query}'\n  Suggestion: The site may be down or blocking requests; try another source")]
    HttpStatus {
        /// The query being searched.
        query: String,
        /// The HTTP status code.
        status: u16,
    },
}

impl SearchError {
    /// Creates an `InvalidUrl` error.
    #[must_use]
    pub fn invalid_url(query: &str, base_url: &str) -> Self {
        Self::InvalidUrl {
            query: query.to_string(),
            base_url: base_url.to_string(),
        }
    }

    /// Classifies a transport error as `Timeout` or `Network`.
    #[must_use]
    pub fn transport(query: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                query: query.to_string(),
            }
        } else {
            Self::Network {
                query: query.to_string(),
                source,
            }
        }
    }

    /// Creates an `HttpStatus` error.
    #[must_use]
    pub fn http_status(query: &str, status: u16) -> Self {
        Self::HttpStatus {
            query: query.to_string(),
            status,
        }
    }
}
