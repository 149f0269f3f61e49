use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use dsprep::ui::ProgressTrackerBuilder;
use dsprep::{DatasetRequest, prepare_dataset};
use dsprep_archive::ExtractOptions;
use dsprep_fetch::{FetchOptions, Fetcher, ReqwestClient, Timeouts};

/// Download an archive (unless already present) and unpack it.
#[derive(Debug, clap::Args)]
pub struct Dataset {
    /// URL of the .tar.gz archive.
    #[arg(long)]
    pub url: String,

    /// Directory the archive is unpacked into.
    #[arg(long, env = "DSPREP_DATASET_DIR", default_value = "data")]
    pub dir: PathBuf,

    /// Where to keep the archive. Defaults to the last segment of the URL.
    #[arg(long)]
    pub filename: Option<PathBuf>,

    /// HTTP connect timeout in seconds.
    #[arg(long, env = "DSPREP_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout: u64,
}

impl Dataset {
    pub fn run(self, quiet: bool) -> anyhow::Result<()> {
        let timeouts = Timeouts::default().connect(Some(Duration::from_secs(self.timeout)));
        let client =
            ReqwestClient::with_timeouts(timeouts).context("Failed to set up the HTTP client")?;
        let fetcher = Fetcher::new(client);

        let download = ProgressTrackerBuilder::default()
            .with_prefix("Downloading")
            .with_finish("done")
            .hidden(quiet)
            .bytes();
        let unpack = ProgressTrackerBuilder::default()
            .with_prefix("Extracting")
            .with_finish("done")
            .hidden(quiet)
            .entries();

        let mut request = DatasetRequest::new(&self.url, &self.dir)
            .fetch_options(FetchOptions::default().on_progress(download.fetch_callback()))
            .extract_options(ExtractOptions::default().on_progress(unpack.extract_callback()));
        if let Some(filename) = self.filename {
            request = request.archive_path(filename);
        }

        let result = prepare_dataset(&fetcher, &request);
        download.close();
        unpack.close();

        let prepared = result.with_context(|| format!("Failed to prepare dataset from {}", self.url))?;
        println!("{}", prepared.summary());
        Ok(())
    }
}
