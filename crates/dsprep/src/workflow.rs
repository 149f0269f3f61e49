use std::path::PathBuf;

use dsprep_archive::{ExtractOptions, ExtractReport, extract_safely_with_options};
use dsprep_fetch::{FetchOptions, FetchOutcome, Fetcher, HttpClient, filename_from_url};
use dsprep_fs::ensure_directory;
use tracing::info;

use crate::error::Result;

/// What to download and where to unpack it.
#[derive(Debug, Clone)]
pub struct DatasetRequest {
    pub url: String,
    pub dataset_dir: PathBuf,
    /// Local archive path. Default: the last path segment of `url`, relative
    /// to the working directory.
    pub archive_path: Option<PathBuf>,
    pub fetch: FetchOptions,
    pub extract: ExtractOptions,
}

impl DatasetRequest {
    pub fn new(url: impl Into<String>, dataset_dir: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            dataset_dir: dataset_dir.into(),
            archive_path: None,
            fetch: FetchOptions::default(),
            extract: ExtractOptions::default(),
        }
    }

    #[must_use]
    pub fn archive_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.archive_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn fetch_options(mut self, options: FetchOptions) -> Self {
        self.fetch = options;
        self
    }

    #[must_use]
    pub fn extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }
}

#[derive(Debug, Clone)]
pub struct PreparedDataset {
    pub archive_path: PathBuf,
    pub fetch: FetchOutcome,
    pub report: ExtractReport,
}

impl PreparedDataset {
    /// Console line announcing the archive and its size on disk.
    pub fn summary(&self) -> String {
        format!(
            "Successfully downloaded {} {} bytes.",
            self.archive_path.display(),
            self.report.archive_bytes
        )
    }
}

/// Download the archive unless it is already on disk, then unpack it into
/// `request.dataset_dir`.
///
/// An archive with any entry resolving outside the dataset directory is
/// rejected as a whole and nothing is unpacked. The downloaded archive is
/// kept either way.
pub fn prepare_dataset<C: HttpClient>(
    fetcher: &Fetcher<C>,
    request: &DatasetRequest,
) -> Result<PreparedDataset> {
    let archive_path = match &request.archive_path {
        Some(path) => path.clone(),
        None => PathBuf::from(filename_from_url(&request.url)?),
    };

    let fetch = fetcher.fetch_if_absent(&request.url, &archive_path, &request.fetch)?;
    ensure_directory(&request.dataset_dir)?;
    let report = extract_safely_with_options(&archive_path, &request.dataset_dir, &request.extract)?;

    info!(
        archive = %archive_path.display(),
        destination = %request.dataset_dir.display(),
        entries = report.entry_count,
        downloaded = fetch.was_downloaded(),
        "dataset ready"
    );

    Ok(PreparedDataset {
        archive_path,
        fetch,
        report,
    })
}
