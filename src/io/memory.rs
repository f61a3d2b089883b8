use std::io::Cursor;
use std::sync::Arc;

use super::ArchiveSource;
use crate::error::Result;

/// Archive held entirely in memory.
///
/// Cloning is cheap; every [`open`](ArchiveSource::open) hands out an
/// independent cursor over the same bytes.
#[derive(Debug, Clone)]
pub struct MemoryArchive {
    bytes: Arc<[u8]>,
}

impl MemoryArchive {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl ArchiveSource for MemoryArchive {
    type Cursor = Cursor<Arc<[u8]>>;

    fn open(&self) -> Result<Self::Cursor> {
        Ok(Cursor::new(Arc::clone(&self.bytes)))
    }
}
