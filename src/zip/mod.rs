//! ZIP archive reading through local file headers.
//!
//! ## Architecture
//!
//! - [`structures`]: header fields, flags, DOS timestamps and name matching
//! - [`parser`]: decoding one local file header, including the data
//!   descriptor search for streamed entries
//! - [`checksum`]: running CRC-32
//! - [`inflate`]: the decompression seam and its `flate2` backend
//! - [`extractor`]: pulling one entry's bytes into memory
//! - [`scanner`]: counting, indexing and searching entries
//!
//! ## Format Overview
//!
//! The body of a ZIP file is a run of entries, each a local file header
//! followed by the name, the extra field, the compressed data and, for
//! streamed entries, a data descriptor. The central directory and end
//! record that follow the last entry are never read here: the walk simply
//! stops at the first position that is not a local file header.
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No ZIP64 sizes
//! - Only STORED is handled directly; DEFLATE and anything else go through
//!   a [`Decompressor`]

pub mod checksum;
mod extractor;
pub mod inflate;
pub mod parser;
mod scanner;
mod structures;

pub use checksum::{Checksum, crc32};
pub use extractor::{ExtractedEntry, ZipExtractor};
pub use inflate::{Decompressor, FlateDecompressor};
pub use parser::{DescriptorSearch, parse_header};
pub use scanner::{EntryInfo, ZipScanner};
pub use structures::*;
