use crate::data::options::FetchPhase;

/// Snapshot of a download, handed to progress callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub phase: FetchPhase,

    /// Bytes written to the staging file so far.
    pub bytes_downloaded: u64,

    /// Total expected bytes, if the server sent `Content-Length`.
    pub total_bytes: Option<u64>,
}

impl Progress {
    /// Percentage of completion, or `None` if `total_bytes` is unknown.
    #[must_use]
    pub fn percentage(&self) -> Option<f64> {
        self.total_bytes.map(|total| {
            if total == 0 {
                if self.is_completed() { 100.0 } else { 0.0 }
            } else {
                (self.bytes_downloaded as f64 / total as f64) * 100.0
            }
        })
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == FetchPhase::Completed
    }
}

/// What [`crate::Fetcher::fetch_if_absent`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded { bytes: u64 },
    AlreadyPresent { bytes: u64 },
}

impl FetchOutcome {
    /// Size of the file now on disk.
    pub fn bytes(&self) -> u64 {
        match *self {
            Self::Downloaded { bytes } | Self::AlreadyPresent { bytes } => bytes,
        }
    }

    pub fn was_downloaded(&self) -> bool {
        matches!(self, Self::Downloaded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(phase: FetchPhase, done: u64, total: Option<u64>) -> Progress {
        Progress {
            phase,
            bytes_downloaded: done,
            total_bytes: total,
        }
    }

    #[test]
    fn percentage_with_known_total() {
        let p = progress(FetchPhase::Downloading, 25, Some(100));
        assert_eq!(p.percentage(), Some(25.0));
    }

    #[test]
    fn percentage_without_total() {
        assert_eq!(progress(FetchPhase::Downloading, 25, None).percentage(), None);
    }

    #[test]
    fn empty_body_percentage() {
        assert_eq!(progress(FetchPhase::Downloading, 0, Some(0)).percentage(), Some(0.0));
        assert_eq!(progress(FetchPhase::Completed, 0, Some(0)).percentage(), Some(100.0));
    }

    #[test]
    fn outcome_bytes() {
        assert_eq!(FetchOutcome::Downloaded { bytes: 3 }.bytes(), 3);
        assert!(!FetchOutcome::AlreadyPresent { bytes: 7 }.was_downloaded());
    }
}
