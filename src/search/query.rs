//! Progressive query narrowing.
//!
//! SubHD matches the whole phrase, so a long keyword list often finds
//! nothing. [`QueryReducer`] yields the full phrase first and then drops the
//! trailing keyword one at a time, ending with the single leading keyword.

use std::iter::FusedIterator;

/// Iterator over successively shorter search queries.
///
/// ```
/// use subgrab_core::search::QueryReducer;
///
/// let queries: Vec<String> = QueryReducer::new(["the", "matrix", "1999"]).collect();
/// assert_eq!(queries, ["the matrix 1999", "the matrix", "the"]);
/// ```
#[derive(Debug, Clone)]
pub struct QueryReducer {
    keywords: Vec<String>,
    started: bool,
}

impl QueryReducer {
    /// Creates a reducer over `keywords`, most significant first.
    #[must_use]
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            started: false,
        }
    }

    /// Number of keywords in the most recently yielded query.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.keywords.len()
    }
}

impl Iterator for QueryReducer {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.started {
            if self.keywords.len() <= 1 {
                self.keywords.clear();
                return None;
            }
            self.keywords.pop();
        }
        self.started = true;

        if self.keywords.is_empty() {
            return None;
        }
        Some(self.keywords.join(" "))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = if self.started {
            self.keywords.len().saturating_sub(1)
        } else {
            self.keywords.len()
        };
        (left, Some(left))
    }
}

impl ExactSizeIterator for QueryReducer {}

impl FusedIterator for QueryReducer {}
