//! Search-result page extraction.
//!
//! Turns one SubHD result page into rows, or one of the two page-level
//! signals (no hits, rejected query). Lookups that find nothing skip the row
//! instead of failing the page.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::site::{DISALLOWED_CHARS_MARKER, ZERO_RESULTS_MARKER};
use crate::video::ContentType;

/// Compiles a CSS selector at static init; panics on invalid pattern.
pub(crate) fn compile_static_selector(pattern: &str) -> Selector {
    Selector::parse(pattern).unwrap_or_else(|e| panic!("invalid static selector '{pattern}': {e:?}"))
}

static SUMMARY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("small"));
static RESULT_BOX_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("div.mb-4.bg-white.rounded.shadow-sm"));
static MOVIE_BADGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("div.px-1.rounded-sm.bg-danger.text-white"));
static TITLE_BLOCK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("div.f12.pt-1"));
static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("a"));

/// Path fragment shared by subtitle detail links (`/a/<id>`).
const DETAIL_PATH_MARKER: &str = "/a";

/// One usable result box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// Link text, trimmed.
    pub title: String,
    /// Link target as found on the page (usually site-relative).
    pub href: String,
    /// Full text of the result box, used for scoring.
    pub text: String,
}

/// Classification of one search-result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPage {
    /// Result rows that passed the type and link filters (possibly empty).
    Rows(Vec<ResultRow>),
    /// The page reports zero total hits.
    NoResults,
    /// SubHD refused the query text.
    Rejected,
}

/// Parses a search-result page.
///
/// Movie searches skip rows without the movie badge. Rows whose link is
/// missing or does not point at a subtitle detail page are skipped too.
#[must_use]
pub fn extract_search_page(html: &str, content_type: ContentType) -> SearchPage {
    let document = Html::parse_document(html);

    match document.select(&SUMMARY_SELECTOR).next() {
        Some(summary) => {
            if element_text(summary).contains(ZERO_RESULTS_MARKER) {
                return SearchPage::NoResults;
            }
        }
        None => {
            if element_text(document.root_element()).contains(DISALLOWED_CHARS_MARKER) {
                return SearchPage::Rejected;
            }
        }
    }

    let rows = document
        .select(&RESULT_BOX_SELECTOR)
        .filter_map(|result_box| extract_row(result_box, content_type))
        .collect();
    SearchPage::Rows(rows)
}

fn extract_row(result_box: ElementRef<'_>, content_type: ContentType) -> Option<ResultRow> {
    let has_movie_badge = result_box.select(&MOVIE_BADGE_SELECTOR).next().is_some();
    if content_type.is_movie() && !has_movie_badge {
        return None;
    }

    let anchor = result_box
        .select(&TITLE_BLOCK_SELECTOR)
        .next()?
        .select(&ANCHOR_SELECTOR)
        .next()?;
    let href = anchor.value().attr("href")?.trim();
    if !href.contains(DETAIL_PATH_MARKER) {
        return None;
    }

    Some(ResultRow {
        title: element_text(anchor).trim().to_string(),
        href: href.to_string(),
        text: element_text(result_box),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
