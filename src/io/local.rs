use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::ArchiveSource;
use crate::error::{Result, ZipError};

/// Archive stored on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalArchive {
    path: PathBuf,
}

impl LocalArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArchiveSource for LocalArchive {
    type Cursor = BufReader<File>;

    fn open(&self) -> Result<Self::Cursor> {
        let file = File::open(&self.path).map_err(|source| ZipError::OpenFailure {
            path: self.path.clone(),
            source,
        })?;
        Ok(BufReader::new(file))
    }
}
