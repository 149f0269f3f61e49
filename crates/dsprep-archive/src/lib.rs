//! Gzip tar extraction that refuses entries escaping the destination.
//!
//! - `sanitize.rs` - Lexical path normalization and [`is_descendant_path`]
//! - `extract.rs` - Validate-then-unpack pipeline
//! - `links.rs` - Symlinks planned so far, followed when placing later entries
//! - `format.rs` - Magic byte detection
//! - `entry.rs` - Entry records and the extraction report

pub use entry::{Entry, EntryKind, ExtractProgress, ExtractReport};
pub use error::{Error, Result};
pub use extract::{extract_safely, extract_safely_with_options};
pub use format::{ArchiveFormat, detect_format};
pub use options::ExtractOptions;
pub use sanitize::{is_descendant_path, normalize_path};

mod entry;
mod error;
mod extract;
mod format;
mod links;
mod options;
mod sanitize;
