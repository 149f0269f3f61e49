//! Blocking HTTP download with progress reporting and atomic placement.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Options and progress types
//! - [`core`] - Pure helpers
//! - [`effects`] - Network and disk I/O behind the [`HttpClient`] trait
//!
//! # Key Features
//!
//! - **Skip if present**: [`Fetcher::fetch_if_absent`] never touches the network for an existing file
//! - **Atomic Placement**: the body lands in a staging file that is renamed on success
//! - **Mechanism-Only**: no retries and no UI; callers observe progress through a callback

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use crate::core::filename_from_url;
pub use data::{FetchOptions, FetchOutcome, FetchPhase, Progress, Timeouts};
pub use effects::{Fetcher, HttpClient, Response};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{BoxError, FetchError, Result};
