use std::io::{self, Read, Seek};

/// Container formats recognised from magic bytes.
///
/// Only [`ArchiveFormat::TarGz`] can be extracted; the others are detected so
/// the error can say what the file actually is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Tar,
    TarXz,
    TarZstd,
    Zip,
}

impl ArchiveFormat {
    pub fn is_supported(self) -> bool {
        matches!(self, Self::TarGz)
    }
}

pub fn detect_format(data: &[u8]) -> Option<ArchiveFormat> {
    match data {
        [0x1F, 0x8B, ..] => Some(ArchiveFormat::TarGz),
        [0x50, 0x4B, 0x03, 0x04, ..] => Some(ArchiveFormat::Zip),
        [0x28, 0xB5, 0x2F, 0xFD, ..] => Some(ArchiveFormat::TarZstd),
        [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00, ..] => Some(ArchiveFormat::TarXz),
        _ if is_tar_header(data) => Some(ArchiveFormat::Tar),
        _ => None,
    }
}

fn is_tar_header(data: &[u8]) -> bool {
    data.len() >= 263 && data[257..262] == *b"ustar"
}

/// Sniff the format and leave the reader at its start.
pub fn detect_from_reader<R: Read + Seek>(reader: &mut R) -> io::Result<Option<ArchiveFormat>> {
    let mut header = [0u8; 512];
    let mut filled = 0;
    while filled < header.len() {
        match reader.read(&mut header[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    reader.rewind()?;
    Ok(detect_format(&header[..filled]))
}
