//! Detail-page and token-exchange parsing.
//!
//! All lookups return `Option`; the resolver decides what a missing element
//! means for the download attempt.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use scraper::Selector;
use serde::Deserialize;

use crate::search::compile_static_selector;

static PREVIEW_ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("div.border-top.border-light.px-3.py-3.clearfix"));
static PREVIEW_BUTTON_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("div.float-right.text-secondary a"));
static DOWNLOAD_BUTTON_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("button#down"));
static SIGNED_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r#"https?:[^"]*"#));

/// Attribute on `button#down` carrying the legacy download token.
pub(crate) const TOKEN_ATTR: &str = "dtoken1";

/// Compiles a regex at static init; panics on invalid pattern.
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Subtitle file offered through the detail page's preview control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewTarget {
    /// Value of the preview button's `sid` attribute.
    pub sid: String,
    /// Value of the preview button's `data-fname` attribute.
    pub file_name: String,
}

/// Archive format guessed from the signed download URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    Rar,
    Zip,
    SevenZip,
    /// None of the known extensions appear in the URL.
    Unknown,
}

impl ArchiveType {
    /// Detects the archive type from substrings of `url`.
    ///
    /// Precedence is rar, then zip, then 7z; the first match wins.
    #[must_use]
    pub fn detect(url: &str) -> Self {
        let lower = url.to_ascii_lowercase();
        if lower.contains("rar") {
            Self::Rar
        } else if lower.contains("zip") {
            Self::Zip
        } else if lower.contains("7z") {
            Self::SevenZip
        } else {
            Self::Unknown
        }
    }

    /// File extension without the dot, or `"Unknown"`.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Rar => "rar",
            Self::Zip => "zip",
            Self::SevenZip => "7z",
            Self::Unknown => "Unknown",
        }
    }

    #[must_use]
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl std::fmt::Display for ArchiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// First preview control on the detail page that carries both attributes.
#[must_use]
pub fn find_preview_target(html: &str) -> Option<PreviewTarget> {
    let document = Html::parse_document(html);
    document.select(&PREVIEW_ROW_SELECTOR).find_map(|row| {
        let button = row.select(&PREVIEW_BUTTON_SELECTOR).next()?;
        Some(PreviewTarget {
            sid: button.value().attr("sid")?.to_string(),
            file_name: button.value().attr("data-fname")?.to_string(),
        })
    })
}

/// Legacy download token from `button#down`.
#[must_use]
pub fn find_download_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&DOWNLOAD_BUTTON_SELECTOR)
        .next()
        .and_then(|button| button.value().attr(TOKEN_ATTR))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Subtitle id: the last path segment of the detail URL.
#[must_use]
pub fn subtitle_id(detail_url: &str) -> Option<&str> {
    let without_query = detail_url.split(['?', '#']).next().unwrap_or(detail_url);
    without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.contains(':'))
}

/// Envelope of the token-exchange response.
#[derive(Debug, Deserialize)]
pub(crate) struct DownAjaxReply {
    pub(crate) success: bool,
}

/// Extracts the signed download URL from the token-exchange body.
///
/// Contract: the first absolute `http`/`https` URL literal in the raw body,
/// cut before the next double quote, decoded as a JSON string so escaped
/// slashes and `\uXXXX` sequences come back as the characters they stand for.
/// Kept separate so it can become a structured field lookup once the
/// response shape is pinned down.
#[must_use]
pub fn extract_signed_url(body: &str) -> Option<String> {
    SIGNED_URL_RE
        .find(body)
        .map(|m| decode_json_url_field(m.as_str()))
        .filter(|url| url.len() > "http://".len())
}

fn decode_json_url_field(value: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{value}\"")).unwrap_or_else(|_| {
        value
            .replace(r"\/", "/")
            .replace(r"\u002F", "/")
            .replace(r"\u0026", "&")
    })
}
