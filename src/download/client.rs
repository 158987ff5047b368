//! Streamed GET of the final subtitle archive.
//!
//! The payload is accumulated in memory; archive extraction and writing to
//! disk belong to the caller.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use super::error::DownloadError;
use super::progress::ProgressSink;

/// Bytes received from a completed streamed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPayload {
    /// The full response body.
    pub bytes: Vec<u8>,
    /// Content-Length announced by the server, if any.
    pub content_length: Option<u64>,
}

/// Streams a URL into memory with progress reporting and a hard timeout.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use subgrab_core::download::{NoProgress, StreamingFetcher};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = StreamingFetcher::new(reqwest::Client::new(), Duration::from_secs(60));
/// let payload = fetcher
///     .fetch("http://dl.example/sub.rar", "sub", &mut NoProgress)
///     .await?;
/// println!("{} bytes", payload.bytes.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StreamingFetcher {
    client: Client,
    timeout: Duration,
}

impl StreamingFetcher {
    /// Creates a fetcher; `timeout` bounds the whole request including the body.
    #[must_use]
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Fetches `url`, reporting cumulative bytes to `progress` after every chunk.
    ///
    /// An empty body is a successful fetch with zero bytes, distinct from
    /// [`DownloadError::Timeout`].
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request or body stream times out
    /// - The request fails at the network level
    /// - The server returns an error status (4xx, 5xx)
    #[instrument(skip(self, progress), fields(url = %url))]
    pub async fn fetch(
        &self,
        url: &str,
        label: &str,
        progress: &mut dyn ProgressSink,
    ) -> Result<FetchedPayload, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
        debug!("starting streamed fetch");

        let response = self
            .client
            .get(parsed)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| DownloadError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let content_length = response.content_length();
        progress.start(label, content_length);
        let result = accumulate(response, url, progress).await;
        progress.finish();

        let bytes = result?;
        info!(bytes = bytes.len(), "fetch complete");
        Ok(FetchedPayload {
            bytes,
            content_length,
        })
    }
}

async fn accumulate(
    response: reqwest::Response,
    url: &str,
    progress: &mut dyn ProgressSink,
) -> Result<Vec<u8>, DownloadError> {
    let capacity = response
        .content_length()
        .and_then(|len| usize::try_from(len).ok())
        .unwrap_or(0);
    let mut bytes = Vec::with_capacity(capacity);
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::transport(url, e))?;
        bytes.extend_from_slice(&chunk);
        progress.advance(bytes.len() as u64);
    }

    Ok(bytes)
}
