use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::progress::Progress;

/// Read buffer used while streaming the body to disk.
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Phases of a download operation.
///
/// Downloads progress through these phases in order:
/// Connecting → Downloading → Committing → Completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Request sent, waiting for the response headers.
    #[default]
    Connecting,

    /// Streaming the body into the staging file.
    Downloading,

    /// Moving the staging file to its final path.
    Committing,

    /// Terminal state for successful downloads.
    Completed,
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchPhase::Connecting => write!(f, "Connecting"),
            FetchPhase::Downloading => write!(f, "Downloading"),
            FetchPhase::Committing => write!(f, "Committing"),
            FetchPhase::Completed => write!(f, "Completed"),
        }
    }
}

/// Configuration for a single fetch.
///
/// # Examples
///
/// ```
/// use dsprep_fetch::{FetchOptions, Progress};
/// use std::sync::Arc;
///
/// let options = FetchOptions::default()
///     .header("Authorization", "Bearer token")
///     .on_progress(Arc::new(|progress: &Progress| {
///         if let Some(pct) = progress.percentage() {
///             println!("{pct:.1}%");
///         }
///     }));
/// ```
#[derive(Clone)]
pub struct FetchOptions {
    /// Extra request headers.
    ///
    /// Default: empty
    pub headers: Arc<[(String, String)]>,

    /// Invoked synchronously on every phase transition and after every chunk
    /// written during [`FetchPhase::Downloading`].
    ///
    /// Default: None
    pub on_progress: Option<Arc<dyn Fn(&Progress) + Send + Sync>>,

    /// Size of each body read.
    ///
    /// Default: [`DEFAULT_CHUNK_SIZE`]
    pub chunk_size: usize,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("headers", &self.headers)
            .field("on_progress", &"{ ... }")
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            headers: Arc::new([]),
            on_progress: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl FetchOptions {
    /// Add a single custom HTTP header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers: Vec<_> = self.headers.iter().cloned().collect();
        headers.push((key.into(), value.into()));
        self.headers = Arc::from(headers);
        self
    }

    /// Replace all custom headers.
    #[must_use]
    pub fn headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = Arc::from(headers);
        self
    }

    #[must_use]
    pub fn on_progress(mut self, on_progress: Arc<dyn Fn(&Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// Zero is bumped to one byte.
    #[must_use]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

/// Timeouts applied by [`crate::ReqwestClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Option<Duration>,
    /// Whole-request timeout. `None` lets large downloads run as long as they need.
    pub total: Option<Duration>,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Some(Duration::from_secs(30)),
            total: None,
        }
    }
}

impl Timeouts {
    #[must_use]
    pub fn connect(mut self, connect: Option<Duration>) -> Self {
        self.connect = connect;
        self
    }

    #[must_use]
    pub fn total(mut self, total: Option<Duration>) -> Self {
        self.total = total;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_appends() {
        let options = FetchOptions::default()
            .header("A", "1")
            .header("B", "2");
        assert_eq!(
            &*options.headers,
            &[
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn headers_replace() {
        let options = FetchOptions::default()
            .header("A", "1")
            .headers(vec![("C".to_string(), "3".to_string())]);
        assert_eq!(options.headers.len(), 1);
        assert_eq!(options.headers[0].0, "C");
    }

    #[test]
    fn chunk_size_is_never_zero() {
        assert_eq!(FetchOptions::default().chunk_size(0).chunk_size, 1);
        assert_eq!(FetchOptions::default().chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn phase_display() {
        assert_eq!(FetchPhase::Downloading.to_string(), "Downloading");
        assert_eq!(FetchPhase::default(), FetchPhase::Connecting);
    }

    #[test]
    fn default_timeouts() {
        let timeouts = Timeouts::default();
        assert_eq!(timeouts.connect, Some(Duration::from_secs(30)));
        assert_eq!(timeouts.total, None);
    }
}
