//! Filesystem primitives shared by the dsprep crates.
//!
//! - [`ensure_directory`] - idempotent `mkdir -p`
//! - [`AtomicFile`] - write to a staging file, rename into place on commit

mod dir;
mod error;
pub mod primitives;

pub use dir::{DEFAULT_CHECKPOINTS_DIR, ensure_checkpoints_dir, ensure_directory};
pub use error::{Error, Result};
pub use primitives::AtomicFile;
