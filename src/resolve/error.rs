//! Error types for download resolution.
//!
//! Rate limiting and a timed-out final fetch are not errors; they come back as
//! [`Resolution::Failure`](super::Resolution::Failure). These variants cover
//! faults the caller cannot act on beyond trying another source.

use thiserror::Error;

use crate::download::DownloadError;
use crate::session::SessionError;

/// Errors that can occur while resolving a candidate to bytes.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Network-level failure on the detail page or token exchange.
    #[error("network error requesting '{url}': {source}\n  Suggestion: Check network connectivity to the subtitle site")]
    Network {
        /// The URL being requested.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The detail page or token exchange answered with a non-success status.
    #[error("HTTP {status} requesting '{url}'\n  Suggestion: The site may be down or blocking requests; try another source")]
    HttpStatus {
        /// The URL being requested.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// An element or field the flow depends on is missing.
    #[error("page format changed at '{url}': {reason}\n  Suggestion: The site layout may have changed; try another source")]
    PageFormatChanged {
        /// The page or endpoint whose shape was unexpected.
        url: String,
        /// What was missing or malformed.
        reason: String,
    },

    /// The final fetch failed for a reason other than timeout.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// A session could not be created for a candidate without one.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ResolveError {
    /// Creates a `Network` error.
    #[must_use]
    pub fn network(url: &str, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.to_string(),
            source,
        }
    }

    /// Creates an `HttpStatus` error.
    #[must_use]
    pub fn http_status(url: &str, status: u16) -> Self {
        Self::HttpStatus {
            url: url.to_string(),
            status,
        }
    }

    /// Creates a `PageFormatChanged` error.
    #[must_use]
    pub fn page_format_changed(url: &str, reason: &str) -> Self {
        Self::PageFormatChanged {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
