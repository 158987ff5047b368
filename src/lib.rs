//! SubHD subtitle search and download.
//!
//! This library finds subtitle archives for a video on SubHD, a site with no
//! API beyond its HTML pages, and downloads the one the caller picks.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`search`] - Progressive keyword search, result extraction and ranking
//! - [`resolve`] - Detail page to signed URL resolution and outcome classification
//! - [`download`] - Streamed fetch of the final archive with progress reporting
//! - [`source`] - The [`SubtitleSource`] trait tying search and download together
//! - [`session`] - Shared HTTP client, cookie jar and timeout policy
//! - [`site`] - SubHD origin, paths and marker strings
//! - [`video`] - The read-only search input

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod resolve;
pub mod search;
pub mod session;
pub mod site;
pub mod source;
pub mod video;

// Re-export commonly used types
pub use download::{DownloadError, NoProgress, ProgressSink, StreamingFetcher};
pub use resolve::{
    ArchiveType, RATE_LIMITED_MESSAGE, ResolveError, Resolution, SubhdResolver, TIMEOUT_SENTINEL,
};
pub use search::{Candidate, CandidateSet, DEFAULT_SUB_NUM, SearchError, SubhdSearcher};
pub use session::{HttpSettings, Session, SessionError};
pub use site::SiteConfig;
pub use source::{SourceError, SubhdSource, SubtitleSource};
pub use video::{ContentType, VideoQuery};
