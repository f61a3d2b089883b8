//! Error types for local-header archive reading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, ZipError>;

#[derive(Debug, Error)]
pub enum ZipError {
    /// The bytes at `offset` do not start with a local file header signature.
    ///
    /// Scans treat this as the normal end of the archive body.
    #[error("no local file header at offset {offset}")]
    NotAnArchiveEntry { offset: u64 },

    /// A streamed entry whose data descriptor never appears before end of input.
    #[error("data descriptor for entry at offset {offset} not found before end of input")]
    TruncatedDescriptor { offset: u64 },

    /// The archive file could not be opened.
    #[error("cannot open archive {}: {source}", path.display())]
    OpenFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Extracted data whose CRC-32 differs from the one the header declares.
    #[error("checksum mismatch for {name}: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch {
        name: String,
        expected: u32,
        actual: u32,
    },

    /// A compression method the decompressor cannot handle.
    #[error("unsupported compression method: {0}")]
    UnsupportedMethod(u16),

    /// Any other read or seek failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ZipError {
    /// Whether this error means "there is no further entry here".
    ///
    /// Scanner loops stop on these instead of reporting them.
    pub fn ends_scan(&self) -> bool {
        match self {
            ZipError::NotAnArchiveEntry { .. } | ZipError::TruncatedDescriptor { .. } => true,
            ZipError::Io(e) => e.kind() == io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }

    /// Whether the scan stopped on a damaged entry rather than a clean end.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, ZipError::TruncatedDescriptor { .. })
    }
}
