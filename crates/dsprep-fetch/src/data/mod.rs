//! Configuration and progress types for fetching.

pub mod options;
pub mod progress;

pub use options::{DEFAULT_CHUNK_SIZE, FetchOptions, FetchPhase, Timeouts};
pub use progress::{FetchOutcome, Progress};
