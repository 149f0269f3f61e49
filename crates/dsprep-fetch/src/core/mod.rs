//! Pure helpers with no I/O.

mod filename;

pub use filename::filename_from_url;
