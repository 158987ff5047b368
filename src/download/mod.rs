//! Streamed fetch of the resolved archive URL.
//!
//! # Features
//!
//! - Chunked transfer accumulated in memory
//! - Per-chunk progress callbacks through [`ProgressSink`]
//! - Timeout reported as its own error, separate from an empty body

mod client;
mod error;
mod progress;

pub use client::{FetchedPayload, StreamingFetcher};
pub use error::DownloadError;
pub use progress::{NoProgress, ProgressSink};
