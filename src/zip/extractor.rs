use std::io::Read;

use tracing::{debug, warn};

use super::checksum::Checksum;
use super::inflate::{Decompressor, FlateDecompressor};
use super::parser::{decode_name, parse_header, read_name};
use super::structures::{CompressionMethod, LocalFileHeader};
use crate::error::{Result, ZipError};
use crate::io::ByteCursor;

/// Chunk size for copying stored entries
const COPY_CHUNK: usize = 16 * 1024;

/// One entry pulled out of an archive, fully buffered.
#[derive(Debug, Clone)]
pub struct ExtractedEntry {
    /// Offset of the entry's local file header
    pub offset: u64,
    pub header: LocalFileHeader,
    pub name: String,
    pub data: Vec<u8>,
    /// CRC-32 of `data`
    pub crc32: u32,
    /// False when the header carries a nonzero checksum that `crc32` does
    /// not match. The data is returned either way.
    pub verified: bool,
    /// Offset of the header following this entry
    pub next_offset: u64,
}

impl ExtractedEntry {
    /// Take the data, or fail with [`ZipError::ChecksumMismatch`].
    pub fn into_verified(self) -> Result<Vec<u8>> {
        if self.verified {
            Ok(self.data)
        } else {
            Err(ZipError::ChecksumMismatch {
                name: self.name,
                expected: self.header.crc32,
                actual: self.crc32,
            })
        }
    }
}

/// ZIP entry extractor
///
/// Stored entries are copied directly; everything else goes through the
/// configured [`Decompressor`].
#[derive(Debug, Default)]
pub struct ZipExtractor<D = FlateDecompressor> {
    decompressor: D,
}

impl ZipExtractor<FlateDecompressor> {
    pub fn new() -> Self {
        Self {
            decompressor: FlateDecompressor,
        }
    }
}

impl<D: Decompressor> ZipExtractor<D> {
    pub fn with_decompressor(decompressor: D) -> Self {
        Self { decompressor }
    }

    /// Extract the entry whose local file header starts at the cursor.
    ///
    /// On success the cursor is left on the next header, past the data
    /// descriptor if the entry has one.
    pub fn extract<R: ByteCursor + ?Sized>(&mut self, r: &mut R) -> Result<ExtractedEntry> {
        let header = parse_header(r)?;

        let mut name = Vec::new();
        read_name(r, &header, &mut name)?;
        r.skip(u64::from(header.extra_field_length))?;
        let name = decode_name(&name);
        let payload_start = r.position()?;

        if header.is_encrypted() {
            warn!(name = %name, "entry is encrypted, content is returned as stored");
        }

        let mut data = Vec::new();
        let crc32 = match header.compression_method {
            CompressionMethod::Stored => copy_stored(r, header.uncompressed_size, &mut data)?,
            method => {
                let mut input = (&mut *r).take(u64::from(header.compressed_size));
                self.decompressor.decompress(method, &mut input, &mut data)?
            }
        };

        let verified = header.crc32 == 0 || crc32 == header.crc32;
        if !verified {
            warn!(
                name = %name,
                expected = header.crc32,
                actual = crc32,
                "checksums don't match"
            );
        }

        let next_offset = payload_start
            + u64::from(header.compressed_size)
            + u64::from(header.descriptor_length);
        r.seek_to(next_offset)?;

        debug!(
            offset = header.offset,
            name = %name,
            size = data.len(),
            verified,
            "extracted entry"
        );

        Ok(ExtractedEntry {
            offset: header.offset,
            header,
            name,
            data,
            crc32,
            verified,
            next_offset,
        })
    }
}

/// Copy `len` bytes in bounded chunks, returning their CRC-32.
///
/// `len` comes straight from the header, so `out` only grows as bytes
/// actually arrive.
fn copy_stored<R: Read + ?Sized>(r: &mut R, len: u32, out: &mut Vec<u8>) -> Result<u32> {
    let mut checksum = Checksum::new();
    let mut chunk = vec![0u8; COPY_CHUNK];
    let mut remaining = len as usize;

    while remaining > 0 {
        let n = remaining.min(COPY_CHUNK);
        r.read_exact(&mut chunk[..n])?;
        out.extend_from_slice(&chunk[..n]);
        checksum.update(&chunk[..n]);
        remaining -= n;
    }

    Ok(checksum.finalize())
}
