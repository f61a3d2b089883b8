mod local;
mod memory;

pub use local::LocalArchive;
pub use memory::MemoryArchive;

use std::io::{self, Read, Seek, SeekFrom};

use crate::error::Result;

/// Positioned reads over a seekable byte source.
///
/// Implemented for every `Read + Seek`, so files, buffered files and
/// in-memory cursors all work. Fixed-width little-endian integers are
/// read through [`byteorder::ReadBytesExt`].
pub trait ByteCursor: Read + Seek {
    /// Current offset from the start of the source.
    fn position(&mut self) -> io::Result<u64> {
        self.stream_position()
    }

    /// Move to an absolute offset.
    fn seek_to(&mut self, offset: u64) -> io::Result<u64> {
        self.seek(SeekFrom::Start(offset))
    }

    /// Move forward by `len` bytes. Seeking past the end is allowed; the
    /// next read then reports end of input.
    fn skip(&mut self, len: u64) -> io::Result<u64> {
        let len = i64::try_from(len)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "skip distance too large"))?;
        self.seek(SeekFrom::Current(len))
    }
}

impl<T: Read + Seek + ?Sized> ByteCursor for T {}

/// A place an archive can be opened from.
///
/// Every top-level scanner operation opens its own cursor, scans and drops
/// it, so no cursor state is shared between calls.
pub trait ArchiveSource {
    type Cursor: ByteCursor;

    fn open(&self) -> Result<Self::Cursor>;
}

impl<S: ArchiveSource + ?Sized> ArchiveSource for &S {
    type Cursor = S::Cursor;

    fn open(&self) -> Result<Self::Cursor> {
        (**self).open()
    }
}
