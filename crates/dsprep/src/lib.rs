//! Fetch a dataset archive once and unpack it safely.
//!
//! The mechanisms live in the sibling crates; this crate strings them
//! together in the order a training script needs them and hosts the
//! `dsprep` command line.

mod error;
pub mod ui;
mod workflow;

pub use dsprep_fs::{DEFAULT_CHECKPOINTS_DIR, ensure_checkpoints_dir};
pub use error::{Error, Result};
pub use workflow::{DatasetRequest, PreparedDataset, prepare_dataset};
