#![cfg(feature = "reqwest")]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;

use dsprep_fetch::{FetchOptions, FetchOutcome, Fetcher, ReqwestClient};

/// Answer exactly one request with `status_line` and `body`, returning the URL
/// to hit and the handle that yields the raw request.
fn serve_once(status_line: &'static str, body: &'static [u8]) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let head = format!(
            "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(body).unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{addr}/files/dataset.tar.gz"), handle)
}

fn local_client() -> ReqwestClient {
    ReqwestClient::from_client(
        reqwest::blocking::Client::builder()
            .no_proxy()
            .build()
            .unwrap(),
    )
}

#[test]
fn downloads_body_over_http() {
    let (url, server) = serve_once("HTTP/1.1 200 OK", b"tarball bytes");
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("dataset.tar.gz");

    let fetcher = Fetcher::new(local_client());
    let options = FetchOptions::default().header("X-Dataset", "cifar");
    let outcome = fetcher.fetch_if_absent(&url, &dest, &options).unwrap();

    assert_eq!(outcome, FetchOutcome::Downloaded { bytes: 13 });
    assert_eq!(std::fs::read(&dest).unwrap(), b"tarball bytes");

    let request = server.join().unwrap().to_ascii_lowercase();
    assert!(request.starts_with("get /files/dataset.tar.gz"));
    assert!(request.contains("x-dataset: cifar"));
}

#[test]
fn http_error_status_is_a_network_error() {
    let (url, server) = serve_once("HTTP/1.1 404 Not Found", b"missing");
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("dataset.tar.gz");

    let fetcher = Fetcher::new(local_client());
    let err = fetcher
        .fetch_if_absent(&url, &dest, &FetchOptions::default())
        .unwrap_err();

    assert!(err.is_network());
    assert!(!dest.exists());
    server.join().unwrap();
}

#[test]
fn default_client_builds() {
    assert!(ReqwestClient::new().is_ok());
}
