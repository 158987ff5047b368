//! Download resolution for SubHD detail pages.
//!
//! Resolution walks three stages:
//!
//! 1. **Preview discovery** - the detail page may expose a preview control
//!    naming the subtitle file. It cannot be turned into bytes, so it is only
//!    recorded.
//! 2. **Legacy token exchange** - the detail page is fetched again, the
//!    `dtoken1` token is read from `button#down` and posted to the
//!    `down_ajax` endpoint together with the subtitle id.
//! 3. **Streamed fetch** - the signed URL from the exchange is downloaded with
//!    [`StreamingFetcher`].
//!
//! A `{"success": false}` exchange (rate limiting) and a timed-out fetch are
//! returned as [`Resolution::Failure`] so callers can move on to another
//! source without treating them as faults.

mod error;
mod page;

pub use error::ResolveError;
pub use page::{
    ArchiveType, PreviewTarget, extract_signed_url, find_download_token, find_preview_target,
    subtitle_id,
};

use reqwest::header::{CONTENT_TYPE, REFERER};
use tracing::{debug, info, warn};

use crate::download::{ProgressSink, StreamingFetcher};
use crate::session::{HttpSettings, Session};
use crate::site::SiteConfig;

use page::{DownAjaxReply, TOKEN_ATTR};

/// Message returned when the token exchange reports `success: false`.
pub const RATE_LIMITED_MESSAGE: &str =
    "download too frequently with subhd downloader, please change to other downloaders";

/// Message returned when the final streamed fetch times out.
pub const TIMEOUT_SENTINEL: &str = "false";

/// Outcome of one download attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Archive bytes and the type detected from the signed URL.
    Bytes {
        archive: ArchiveType,
        payload: Vec<u8>,
    },
    /// The fetch succeeded but the body was empty.
    Empty,
    /// Recoverable failure with a human-readable message.
    Failure(String),
}

impl Resolution {
    /// Splits into `(extension, payload, message)`.
    ///
    /// `Bytes` gives `(Some(ext), Some(payload), "")` with `ext` being
    /// `"Unknown"` for unrecognised archives; `Failure` gives
    /// `(None, None, message)`; `Empty` gives `(None, None, "")`.
    #[must_use]
    pub fn into_parts(self) -> (Option<String>, Option<Vec<u8>>, String) {
        match self {
            Self::Bytes { archive, payload } => {
                (Some(archive.extension().to_string()), Some(payload), String::new())
            }
            Self::Empty => (None, None, String::new()),
            Self::Failure(message) => (None, None, message),
        }
    }

    /// True when the token exchange reported rate limiting.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Failure(message) if message == RATE_LIMITED_MESSAGE)
    }

    /// True when the final fetch timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Failure(message) if message == TIMEOUT_SENTINEL)
    }
}

/// Resolves candidate detail pages to archive bytes.
#[derive(Debug, Clone)]
pub struct SubhdResolver {
    site: SiteConfig,
    settings: HttpSettings,
}

impl SubhdResolver {
    #[must_use]
    pub fn new(site: SiteConfig, settings: HttpSettings) -> Self {
        Self { site, settings }
    }

    /// Downloads the subtitle behind `detail_url`.
    ///
    /// `session` should be the one the candidate was found with; a fresh
    /// session is created when it is `None`. `file_name` labels progress.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when a page cannot be fetched, the page or
    /// exchange response is missing an expected element, or the final fetch
    /// fails for a reason other than timeout.
    #[tracing::instrument(skip(self, session, progress), fields(source = "subhd"))]
    pub async fn download(
        &self,
        detail_url: &str,
        file_name: &str,
        session: Option<&Session>,
        progress: &mut dyn ProgressSink,
    ) -> Result<Resolution, ResolveError> {
        let session = match session {
            Some(session) => session.clone(),
            None => Session::new(self.settings.connect_timeout)?,
        };

        let page = self.fetch_detail(&session, detail_url).await?;
        let preview = find_preview_target(&page);
        if let Some(target) = &preview {
            info!(
                sid = %target.sid,
                file_name = %target.file_name,
                "detail page offers preview download; continuing with token exchange"
            );
        }

        let page = self.fetch_detail(&session, detail_url).await?;
        let Some(token) = find_download_token(&page) else {
            if let Some(target) = preview {
                warn!(file_name = %target.file_name, "no download token beside preview");
                return Ok(Resolution::Failure(format!(
                    "subtitle {} is only offered as a preview on subhd, please change to other downloaders",
                    target.file_name
                )));
            }
            return Err(ResolveError::page_format_changed(
                detail_url,
                &format!("download button `#down` with `{TOKEN_ATTR}` not found"),
            ));
        };
        let sub_id = subtitle_id(detail_url).ok_or_else(|| {
            ResolveError::page_format_changed(detail_url, "no subtitle id in detail URL")
        })?;

        let body = self
            .exchange_token(&session, detail_url, sub_id, &token)
            .await?;
        let ajax_url = self.site.download_ajax_url();
        let reply: DownAjaxReply = serde_json::from_str(&body).map_err(|e| {
            ResolveError::page_format_changed(&ajax_url, &format!("unexpected response: {e}"))
        })?;
        if !reply.success {
            warn!(sub_id, "token exchange refused; treating as rate limited");
            return Ok(Resolution::Failure(RATE_LIMITED_MESSAGE.to_string()));
        }
        let Some(download_url) = extract_signed_url(&body) else {
            return Err(ResolveError::page_format_changed(
                &ajax_url,
                "no download URL in successful response",
            ));
        };

        let archive = ArchiveType::detect(&download_url);
        debug!(url = %download_url, archive = %archive, "resolved signed download URL");

        let fetcher = StreamingFetcher::new(session.client().clone(), self.settings.fetch_timeout);
        match fetcher.fetch(&download_url, file_name, progress).await {
            Ok(fetched) if fetched.bytes.is_empty() => {
                warn!(url = %download_url, "download finished with empty body");
                Ok(Resolution::Empty)
            }
            Ok(fetched) => Ok(Resolution::Bytes {
                archive,
                payload: fetched.bytes,
            }),
            Err(error) if error.is_timeout() => {
                warn!(url = %download_url, "download timed out");
                Ok(Resolution::Failure(TIMEOUT_SENTINEL.to_string()))
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn fetch_detail(&self, session: &Session, url: &str) -> Result<String, ResolveError> {
        debug!(url = %url, "fetching detail page");
        let response = session
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| ResolveError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::http_status(url, status.as_u16()));
        }
        response
            .text()
            .await
            .map_err(|e| ResolveError::network(url, e))
    }

    async fn exchange_token(
        &self,
        session: &Session,
        detail_url: &str,
        sub_id: &str,
        token: &str,
    ) -> Result<String, ResolveError> {
        let url = self.site.download_ajax_url();
        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("sub_id", sub_id)
            .append_pair(TOKEN_ATTR, token)
            .finish();
        debug!(url = %url, sub_id, "posting download token");

        let response = session
            .client()
            .post(&url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(REFERER, detail_url)
            .body(form)
            .send()
            .await
            .map_err(|e| ResolveError::network(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::http_status(&url, status.as_u16()));
        }
        response
            .text()
            .await
            .map_err(|e| ResolveError::network(&url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_parts_for_bytes() {
        let resolution = Resolution::Bytes {
            archive: ArchiveType::Zip,
            payload: vec![1, 2, 3],
        };
        assert_eq!(
            resolution.into_parts(),
            (Some("zip".to_string()), Some(vec![1, 2, 3]), String::new())
        );
    }

    #[test]
    fn test_into_parts_for_unknown_archive() {
        let resolution = Resolution::Bytes {
            archive: ArchiveType::Unknown,
            payload: vec![9],
        };
        let (ext, payload, message) = resolution.into_parts();
        assert_eq!(ext.as_deref(), Some("Unknown"));
        assert_eq!(payload, Some(vec![9]));
        assert!(message.is_empty());
    }

    #[test]
    fn test_into_parts_for_failures() {
        let rate_limited = Resolution::Failure(RATE_LIMITED_MESSAGE.to_string());
        assert!(rate_limited.is_rate_limited());
        assert!(!rate_limited.is_timeout());
        let (ext, payload, message) = rate_limited.into_parts();
        assert!(ext.is_none() && payload.is_none());
        assert!(!message.is_empty());

        let timeout = Resolution::Failure(TIMEOUT_SENTINEL.to_string());
        assert!(timeout.is_timeout());
        assert_eq!(timeout.into_parts(), (None, None, "false".to_string()));
    }

    #[test]
    fn test_into_parts_for_empty() {
        assert_eq!(Resolution::Empty.into_parts(), (None, None, String::new()));
    }
}
