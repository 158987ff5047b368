//! Read-only description of the video a subtitle is wanted for.

/// Kind of video being searched for.
///
/// Movie searches drop result rows SubHD does not flag as movies, which keeps
/// TV episodes out of the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    /// Feature film.
    Movie,
    /// Anything else (episodes, specials, unknown).
    #[default]
    Other,
}

impl ContentType {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Other => "other",
        }
    }

    /// True for [`ContentType::Movie`].
    #[must_use]
    pub fn is_movie(self) -> bool {
        self == Self::Movie
    }
}

/// Search input: ordered keywords plus a content type.
///
/// Keywords are ordered most significant first; the search drops tokens from
/// the end when a query is too narrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoQuery {
    keywords: Vec<String>,
    content_type: ContentType,
}

impl VideoQuery {
    /// Creates a query, discarding blank keyword tokens.
    #[must_use]
    pub fn new<I, S>(keywords: I, content_type: ContentType) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords = keywords
            .into_iter()
            .map(Into::into)
            .map(|keyword| keyword.trim().to_string())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        Self {
            keywords,
            content_type,
        }
    }

    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }
}
