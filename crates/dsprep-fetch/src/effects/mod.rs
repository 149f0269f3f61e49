//! The parts of fetching that touch the network or the disk.

mod fetcher;
mod http;

pub use fetcher::Fetcher;
pub use http::{HttpClient, Response};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
