use std::io::{self, Read, Write};
use std::path::Path;

use dsprep_fs::AtomicFile;
use tracing::{debug, info};

use crate::data::{FetchOptions, FetchOutcome, FetchPhase, Progress};
use crate::effects::http::HttpClient;
use crate::error::{FetchError, Result};

/// Downloads files through an [`HttpClient`].
pub struct Fetcher<C: HttpClient> {
    client: C,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Download `url` to `destination` unless a file is already there.
    ///
    /// An existing file is trusted as-is and the client is never called.
    /// A directory at `destination` is an error.
    pub fn fetch_if_absent(
        &self,
        url: &str,
        destination: &Path,
        options: &FetchOptions,
    ) -> Result<FetchOutcome> {
        match std::fs::metadata(destination) {
            Ok(meta) if meta.is_dir() => {
                return Err(FetchError::DestinationIsDirectory(destination.to_path_buf()));
            }
            Ok(meta) => {
                debug!(
                    path = %destination.display(),
                    bytes = meta.len(),
                    "file already present, skipping download"
                );
                return Ok(FetchOutcome::AlreadyPresent { bytes: meta.len() });
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(FetchError::Io {
                    path: destination.to_path_buf(),
                    source: e,
                });
            }
        }

        let bytes = self.fetch(url, destination, options)?;
        Ok(FetchOutcome::Downloaded { bytes })
    }

    /// Download `url` to `destination`, replacing whatever is there.
    ///
    /// The body is streamed into a staging file next to `destination` that is
    /// renamed into place only after the last byte arrived. Returns the number
    /// of bytes written.
    pub fn fetch(&self, url: &str, destination: &Path, options: &FetchOptions) -> Result<u64> {
        report_progress(options, FetchPhase::Connecting, 0, None);

        let response = self
            .client
            .get(url, &options.headers)
            .map_err(|e| FetchError::network(url, e))?;
        let total_bytes = response.content_length;

        let mut staged = AtomicFile::create(destination)?;
        report_progress(options, FetchPhase::Downloading, 0, total_bytes);

        let mut body = response.body;
        let mut buffer = vec![0u8; options.chunk_size.max(1)];
        let mut bytes_downloaded = 0u64;

        loop {
            let n = match body.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(FetchError::network(url, e)),
            };

            staged
                .write_all(&buffer[..n])
                .map_err(|e| FetchError::Io {
                    path: staged.staging_path().to_path_buf(),
                    source: e,
                })?;
            bytes_downloaded += n as u64;
            report_progress(options, FetchPhase::Downloading, bytes_downloaded, total_bytes);
        }

        if let Some(expected) = total_bytes {
            if expected != bytes_downloaded {
                return Err(FetchError::network(
                    url,
                    io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("expected {expected} bytes, received {bytes_downloaded}"),
                    ),
                ));
            }
        }

        report_progress(options, FetchPhase::Committing, bytes_downloaded, total_bytes);
        staged.commit()?;
        report_progress(options, FetchPhase::Completed, bytes_downloaded, total_bytes);

        info!(
            url,
            path = %destination.display(),
            bytes = bytes_downloaded,
            "download finished"
        );
        Ok(bytes_downloaded)
    }
}

#[cfg(feature = "reqwest")]
impl Fetcher<crate::effects::http::ReqwestClient> {
    /// Fetcher backed by a [`crate::ReqwestClient`] with default timeouts.
    pub fn with_default_client() -> Result<Self> {
        Ok(Self::new(crate::effects::http::ReqwestClient::new()?))
    }
}

fn report_progress(
    options: &FetchOptions,
    phase: FetchPhase,
    bytes_downloaded: u64,
    total_bytes: Option<u64>,
) {
    if let Some(ref callback) = options.on_progress {
        callback(&Progress {
            phase,
            bytes_downloaded,
            total_bytes,
        });
    }
}
