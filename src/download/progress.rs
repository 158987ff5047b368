//! Progress reporting hooks for the streamed fetch.

/// Receives byte counts while a payload streams in.
///
/// `advance` is called after every chunk with the cumulative size, so a
/// renderer can display it against the `total` announced in `start`.
pub trait ProgressSink: Send {
    /// Called once before the first chunk. `total` comes from Content-Length.
    fn start(&mut self, _label: &str, _total: Option<u64>) {}

    /// Called after each chunk with the number of bytes received so far.
    fn advance(&mut self, downloaded: u64);

    /// Called once after the last chunk, or when the transfer fails.
    fn finish(&mut self) {}
}

/// Sink that ignores all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn advance(&mut self, _downloaded: u64) {}
}
