//! Subtitle source abstraction.
//!
//! A [`SubtitleSource`] searches one site and downloads a chosen candidate.
//! Callers that know several sites try them in turn and move to the next one
//! when a source reports a recoverable failure.

use async_trait::async_trait;
use thiserror::Error;

use crate::download::ProgressSink;
use crate::resolve::{ResolveError, Resolution, SubhdResolver};
use crate::search::{Candidate, CandidateSet, SearchError, SubhdSearcher};
use crate::session::{HttpSettings, Session, SessionError};
use crate::site::{SOURCE_NAME, SiteConfig};
use crate::video::VideoQuery;

/// Errors surfaced by a [`SubtitleSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// A subtitle site that can be searched and downloaded from.
#[async_trait]
pub trait SubtitleSource: Send + Sync {
    /// Short name for logs and user output.
    fn name(&self) -> &'static str;

    /// Finds up to `sub_num` ranked candidates for `video`.
    async fn search(&self, video: &VideoQuery, sub_num: usize) -> Result<CandidateSet, SourceError>;

    /// Downloads `candidate`, labelling progress with `file_name`.
    async fn download(
        &self,
        candidate: &Candidate,
        file_name: &str,
        progress: &mut dyn ProgressSink,
    ) -> Result<Resolution, SourceError>;
}

/// SubHD search plus download resolution.
#[derive(Debug, Clone)]
pub struct SubhdSource {
    searcher: SubhdSearcher,
    resolver: SubhdResolver,
}

impl SubhdSource {
    /// Creates a source with its own session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the HTTP client cannot be constructed.
    #[tracing::instrument(skip(site, settings), fields(source = "subhd"))]
    pub fn new(site: SiteConfig, settings: HttpSettings) -> Result<Self, SessionError> {
        let session = Session::new(settings.connect_timeout)?;
        Ok(Self::with_session(site, settings, session))
    }

    /// Creates a source that searches through an existing session.
    #[must_use]
    pub fn with_session(site: SiteConfig, settings: HttpSettings, session: Session) -> Self {
        Self {
            searcher: SubhdSearcher::new(site.clone(), session, settings.search_timeout),
            resolver: SubhdResolver::new(site, settings),
        }
    }
}

#[async_trait]
impl SubtitleSource for SubhdSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn search(&self, video: &VideoQuery, sub_num: usize) -> Result<CandidateSet, SourceError> {
        Ok(self.searcher.search(video, sub_num).await?)
    }

    async fn download(
        &self,
        candidate: &Candidate,
        file_name: &str,
        progress: &mut dyn ProgressSink,
    ) -> Result<Resolution, SourceError> {
        Ok(self
            .resolver
            .download(
                &candidate.detail_url,
                file_name,
                candidate.session.as_ref(),
                progress,
            )
            .await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_subhd_source_name() {
        let source = SubhdSource::new(SiteConfig::default(), HttpSettings::default()).unwrap();
        assert_eq!(source.name(), "subhd");
    }

    #[test]
    fn test_source_is_object_safe() {
        let source: Box<dyn SubtitleSource> =
            Box::new(SubhdSource::new(SiteConfig::default(), HttpSettings::default()).unwrap());
        assert_eq!(source.name(), SOURCE_NAME);
    }
}
