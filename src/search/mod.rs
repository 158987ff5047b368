//! Progressive search against the SubHD result pages.
//!
//! # Architecture
//!
//! - [`QueryReducer`] - full keyword phrase first, then drop trailing keywords
//! - [`extract_search_page`] - one result page into rows or a page-level signal
//! - [`language_score`] / [`CandidateSet`] - scoring and the capped, ordered result
//! - [`SubhdSearcher`] - the loop tying them together
//!
//! The loop stops as soon as the set is full, SubHD rejects the query text,
//! or the single-keyword query has been tried.

mod error;
mod extract;
mod query;
mod rank;

pub use error::SearchError;
pub use extract::{ResultRow, SearchPage, extract_search_page};
pub use query::QueryReducer;
pub use rank::{BILINGUAL_SCORE, Candidate, CandidateSet, InsertOutcome, language_score};

pub(crate) use extract::compile_static_selector;

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::session::Session;
use crate::site::{CHOICE_PREFIX, DISALLOWED_CHARS_MARKER, SiteConfig};
use crate::video::VideoQuery;

/// Default number of candidates a search collects.
pub const DEFAULT_SUB_NUM: usize = 5;

/// Drives the query/extract/score loop over one session.
#[derive(Debug, Clone)]
pub struct SubhdSearcher {
    site: SiteConfig,
    session: Session,
    search_timeout: Duration,
}

impl SubhdSearcher {
    /// Creates a searcher issuing requests through `session`.
    #[must_use]
    pub fn new(site: SiteConfig, session: Session, search_timeout: Duration) -> Self {
        Self {
            site,
            session,
            search_timeout,
        }
    }

    /// Session shared with every candidate this searcher produces.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Collects up to `sub_num` ranked candidates for `video`.
    ///
    /// Each query is fully processed before the next, narrower one is
    /// issued. A rejected query ends the search with whatever was collected,
    /// and so does a failed request once at least one candidate is held.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] when a search page cannot be fetched and no
    /// candidate has been collected yet.
    #[tracing::instrument(
        skip(self, video),
        fields(source = "subhd", content_type = video.content_type().as_str())
    )]
    pub async fn search(
        &self,
        video: &VideoQuery,
        sub_num: usize,
    ) -> Result<CandidateSet, SearchError> {
        info!("Searching SUBHD...");

        let mut candidates = CandidateSet::new(sub_num);
        if candidates.is_full() {
            return Ok(candidates);
        }

        for query in QueryReducer::new(video.keywords().iter().cloned()) {
            let html = match self.fetch_page(&query).await {
                Ok(html) => html,
                Err(error) if !candidates.is_empty() => {
                    warn!(
                        query = %query,
                        error = %error,
                        "search request failed; keeping collected candidates"
                    );
                    break;
                }
                Err(error) => return Err(error),
            };

            match extract_search_page(&html, video.content_type()) {
                SearchPage::Rejected => {
                    warn!(query = %query, "[SUBHD ERROR] {DISALLOWED_CHARS_MARKER}");
                    break;
                }
                SearchPage::NoResults => {
                    debug!(query = %query, "no results; narrowing query");
                }
                SearchPage::Rows(rows) => {
                    debug!(query = %query, rows = rows.len(), "parsed result page");
                    for row in rows {
                        self.collect(&mut candidates, row);
                        if candidates.is_full() {
                            break;
                        }
                    }
                }
            }

            if candidates.is_full() {
                debug!(collected = candidates.len(), "candidate cap reached");
                break;
            }
        }

        candidates.rank();
        info!(found = candidates.len(), "SUBHD search finished");
        Ok(candidates)
    }

    fn collect(&self, candidates: &mut CandidateSet, row: ResultRow) {
        let candidate = Candidate {
            display_name: format!("{CHOICE_PREFIX}{}", row.title),
            detail_url: self.site.detail_url(&row.href),
            language_score: language_score(&row.text),
            session: Some(self.session.clone()),
        };
        if candidates.insert(candidate) == InsertOutcome::Duplicate {
            debug!(title = %row.title, "duplicate display name; keeping first");
        }
    }

    async fn fetch_page(&self, query: &str) -> Result<String, SearchError> {
        let url = self
            .site
            .search_url(query)
            .ok_or_else(|| SearchError::invalid_url(query, self.site.base_url()))?;
        debug!(url = %url, "requesting search page");

        let response = self
            .session
            .client()
            .get(url)
            .timeout(self.search_timeout)
            .send()
            .await
            .map_err(|e| SearchError::transport(query, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::transport(query, e))?;

        // The disallowed-characters page arrives with HTTP 400.
        if !status.is_success() && !body.contains(DISALLOWED_CHARS_MARKER) {
            return Err(SearchError::http_status(query, status.as_u16()));
        }
        Ok(body)
    }
}
