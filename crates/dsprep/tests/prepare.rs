use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use dsprep::{DatasetRequest, Error, prepare_dataset};
use dsprep_fetch::{FetchError, Fetcher, HttpClient, Response};
use flate2::Compression;
use flate2::write::GzEncoder;
use tar::{EntryType, Header};

const URL: &str = "https://example.com/datasets/toy.tar.gz";

/// Serves the same archive bytes for every request.
struct ArchiveServer {
    archive: Vec<u8>,
    calls: AtomicUsize,
}

impl ArchiveServer {
    fn new(archive: Vec<u8>) -> Self {
        Self {
            archive,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HttpClient for ArchiveServer {
    type Error = io::Error;

    fn get(&self, _url: &str, _headers: &[(String, String)]) -> Result<Response, io::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Response {
            content_length: Some(self.archive.len() as u64),
            body: Box::new(io::Cursor::new(self.archive.clone())),
        })
    }
}

struct Offline;

impl HttpClient for Offline {
    type Error = io::Error;

    fn get(&self, _url: &str, _headers: &[(String, String)]) -> Result<Response, io::Error> {
        Err(io::Error::new(io::ErrorKind::NotConnected, "offline"))
    }
}

/// In-memory `.tar.gz` with the given file entries. Names go into the header
/// untouched so `..` survives.
fn tar_gz(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (name, data) in files {
        let mut header = Header::new_gnu();
        let raw = &mut header.as_gnu_mut().unwrap().name;
        raw[..name.len()].copy_from_slice(name.as_bytes());
        header.set_entry_type(EntryType::Regular);
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append(&header, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

#[test]
fn downloads_and_unpacks() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = tar_gz(&[("data/a.txt", b"alpha"), ("data/b.txt", b"bravo")]);
    let archive_len = archive.len() as u64;
    let fetcher = Fetcher::new(ArchiveServer::new(archive));

    let request = DatasetRequest::new(URL, tmp.path().join("dataset"))
        .archive_path(tmp.path().join("toy.tar.gz"));
    let prepared = prepare_dataset(&fetcher, &request).unwrap();

    assert!(prepared.fetch.was_downloaded());
    assert_eq!(prepared.report.archive_bytes, archive_len);
    assert_eq!(prepared.report.entry_count, 2);

    let dataset = tmp.path().join("dataset");
    assert_eq!(std::fs::read(dataset.join("data/a.txt")).unwrap(), b"alpha");
    assert_eq!(std::fs::read(dataset.join("data/b.txt")).unwrap(), b"bravo");

    let summary = prepared.summary();
    assert!(summary.starts_with("Successfully downloaded "));
    assert!(summary.ends_with(&format!("toy.tar.gz {archive_len} bytes.")));
}

#[test]
fn second_run_reuses_archive() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = Fetcher::new(ArchiveServer::new(tar_gz(&[("a.txt", b"alpha")])));
    let request = DatasetRequest::new(URL, tmp.path().join("dataset"))
        .archive_path(tmp.path().join("toy.tar.gz"));

    prepare_dataset(&fetcher, &request).unwrap();
    let again = prepare_dataset(&fetcher, &request).unwrap();

    assert_eq!(fetcher.client().calls(), 1);
    assert!(!again.fetch.was_downloaded());
    assert_eq!(
        std::fs::read(tmp.path().join("dataset/a.txt")).unwrap(),
        b"alpha"
    );
}

#[test]
fn escaping_entry_aborts_extraction() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = Fetcher::new(ArchiveServer::new(tar_gz(&[
        ("ok.txt", b"fine"),
        ("../evil.txt", b"pwned"),
    ])));
    let dataset = tmp.path().join("dataset");
    let request = DatasetRequest::new(URL, &dataset).archive_path(tmp.path().join("toy.tar.gz"));

    let err = prepare_dataset(&fetcher, &request).unwrap_err();

    match err {
        Error::Archive(e) => assert!(e.is_path_traversal(), "unexpected error: {e}"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!tmp.path().join("evil.txt").exists());
    assert!(!dataset.join("ok.txt").exists());
    assert!(tmp.path().join("toy.tar.gz").exists());
}

#[test]
fn network_failure_propagates() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = Fetcher::new(Offline);
    let dataset = tmp.path().join("dataset");
    let request = DatasetRequest::new(URL, &dataset).archive_path(tmp.path().join("toy.tar.gz"));

    let err = prepare_dataset(&fetcher, &request).unwrap_err();

    assert!(matches!(err, Error::Fetch(FetchError::Network { .. })));
    assert!(!dataset.exists());
    assert!(!tmp.path().join("toy.tar.gz").exists());
}

#[test]
fn bad_url_without_filename_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = Fetcher::new(Offline);
    let request = DatasetRequest::new("https://example.com/", tmp.path().join("dataset"));

    let err = prepare_dataset(&fetcher, &request).unwrap_err();

    assert!(matches!(err, Error::Fetch(FetchError::InvalidUrl { .. })));
}
