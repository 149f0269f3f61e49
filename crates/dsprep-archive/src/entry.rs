use std::path::{Path, PathBuf};

/// One archive record, either planned or already written out.
#[derive(Clone, Debug)]
pub struct Entry {
    pub original_path: PathBuf,
    pub target_path: PathBuf,
    pub size: u64,
    pub mode: Option<u32>,
    pub kind: EntryKind,
}

impl Entry {
    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File)
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    pub fn link_target(&self) -> Option<&Path> {
        match &self.kind {
            EntryKind::Symlink { target } | EntryKind::Hardlink { target } => Some(target),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink { target: PathBuf },
    Hardlink { target: PathBuf },
    /// Devices, FIFOs and other records that are never written to disk.
    Unsupported,
}

/// Outcome of a successful extraction.
#[derive(Clone, Debug)]
pub struct ExtractReport {
    pub archive_path: PathBuf,
    /// Size of the compressed archive file on disk.
    pub archive_bytes: u64,
    pub destination: PathBuf,
    pub entry_count: usize,
    /// Sum of the unpacked payload sizes.
    pub total_bytes: u64,
    pub skipped: usize,
    pub entries: Vec<Entry>,
}

/// Snapshot handed to the extraction progress callback after each entry.
#[derive(Clone, Debug)]
pub struct ExtractProgress {
    pub entries_done: usize,
    pub entries_total: usize,
    pub bytes_processed: u64,
    pub current: PathBuf,
}
