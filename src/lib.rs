//! # lhunzip
//!
//! Extract entries from ZIP archives using only the local file headers in
//! the archive body, without consulting the central directory.
//!
//! Because nothing at the end of the file is needed, this works on
//! archives whose tail is damaged or missing, and on the ZIP containers
//! used by office documents where the wanted part is near the front.
//!
//! ## Features
//!
//! - Count entries, locate them by index or by name (exact or substring,
//!   case-sensitive or not)
//! - Streamed entries whose sizes live in a trailing data descriptor
//! - STORED entries copied directly, DEFLATE through `flate2`, other
//!   methods through a pluggable [`Decompressor`]
//! - CRC-32 verification reported on every extracted entry
//!
//! ## Example
//!
//! ```no_run
//! use lhunzip::{LocalArchive, MatchFlags, ZipScanner};
//!
//! fn main() -> lhunzip::Result<()> {
//!     let mut scanner = ZipScanner::new(LocalArchive::new("archive.zip"));
//!
//!     for entry in scanner.entries()? {
//!         println!("{:>10}  {}", entry.header.uncompressed_size, entry.name);
//!     }
//!
//!     if let Some(entry) = scanner.extract_by_name("mimetype", MatchFlags::default())? {
//!         println!("{}", String::from_utf8_lossy(&entry.data));
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod zip;

pub use cli::Cli;
pub use error::{Result, ZipError};
pub use io::{ArchiveSource, ByteCursor, LocalArchive, MemoryArchive};
pub use zip::{
    CompressionMethod, Decompressor, EntryInfo, ExtractedEntry, FlateDecompressor,
    LocalFileHeader, MatchFlags, ZipExtractor, ZipScanner,
};
