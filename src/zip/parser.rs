//! Local file header parsing.
//!
//! Every entry in a ZIP body starts with a local file header:
//!
//! ```text
//! signature (4) version (2) flags (2) method (2) time (2) date (2)
//! crc32 (4) compressed size (4) uncompressed size (4)
//! name length (2) extra length (2) | name | extra field | payload
//! ```
//!
//! When flag bit 3 is set the writer did not know the sizes up front and
//! the crc32/size fields are zero. The real values follow the payload in a
//! data descriptor (`PK\x07\x08`, crc32, compressed size, uncompressed
//! size). Without a central directory the only way to find it is to scan
//! forward for its signature.
//!
//! The scan can stop early on signature bytes that happen to occur inside
//! the compressed payload. Nothing in the local header alone can rule that
//! out.

use std::io::{self, Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::{debug, trace};

use super::structures::*;
use crate::error::{Result, ZipError};
use crate::io::ByteCursor;

/// Bytes read per step while scanning for a data descriptor.
const SCAN_WINDOW: usize = 8 * 1024;

/// Outcome of a forward search for a data descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorSearch {
    /// `position` is the offset of the descriptor signature.
    Found {
        position: u64,
        descriptor: DataDescriptor,
    },
    NotFound,
}

/// Parse the local file header at the cursor.
///
/// On success the cursor sits right after the fixed 30 bytes, at the start
/// of the name. For streamed entries the crc32 and sizes are taken from the
/// data descriptor and `descriptor_length` is set.
///
/// When a streamed entry has no descriptor the cursor is put back at the
/// start of the name before [`ZipError::TruncatedDescriptor`] is returned.
/// After a signature mismatch or a short read its position is unspecified.
pub fn parse_header<R: ByteCursor + ?Sized>(r: &mut R) -> Result<LocalFileHeader> {
    let offset = r.position()?;

    let mut buf = [0u8; LFH_SIZE as usize];
    if let Err(e) = r.read_exact(&mut buf) {
        return Err(match e.kind() {
            io::ErrorKind::UnexpectedEof => ZipError::NotAnArchiveEntry { offset },
            _ => e.into(),
        });
    }

    let mut cursor = Cursor::new(&buf[..]);
    if cursor.read_u32::<LittleEndian>()? != LFH_SIGNATURE {
        return Err(ZipError::NotAnArchiveEntry { offset });
    }

    let mut header = LocalFileHeader {
        offset,
        version: cursor.read_u16::<LittleEndian>()?,
        flags: cursor.read_u16::<LittleEndian>()?,
        compression_method: CompressionMethod::from_u16(cursor.read_u16::<LittleEndian>()?),
        last_mod_time: cursor.read_u16::<LittleEndian>()?,
        last_mod_date: cursor.read_u16::<LittleEndian>()?,
        crc32: cursor.read_u32::<LittleEndian>()?,
        compressed_size: cursor.read_u32::<LittleEndian>()?,
        uncompressed_size: cursor.read_u32::<LittleEndian>()?,
        name_length: cursor.read_u16::<LittleEndian>()?,
        extra_field_length: cursor.read_u16::<LittleEndian>()?,
        descriptor_length: 0,
    };

    if header.is_streamed() {
        let data_start = r.position()?;
        let search = find_descriptor(r);
        r.seek_to(data_start)?;

        match search? {
            DescriptorSearch::Found {
                position,
                descriptor,
            } => {
                debug!(offset, position, ?descriptor, "found data descriptor");
                header.crc32 = descriptor.crc32;
                header.compressed_size = descriptor.compressed_size;
                header.uncompressed_size = descriptor.uncompressed_size;
                header.descriptor_length = DESCRIPTOR_SIZE;
            }
            DescriptorSearch::NotFound => {
                debug!(offset, "no data descriptor before end of input");
                return Err(ZipError::TruncatedDescriptor { offset });
            }
        }
    }

    trace!(?header, "parsed local file header");
    Ok(header)
}

/// Scan forward from the cursor for a data descriptor, up to end of input.
///
/// The cursor is left wherever the scan stopped; callers restore it.
pub fn find_descriptor<R: ByteCursor + ?Sized>(r: &mut R) -> Result<DescriptorSearch> {
    let signature = DESCRIPTOR_SIGNATURE.to_le_bytes();
    let mut window = vec![0u8; SCAN_WINDOW];
    // Offset of window[0] in the input
    let mut base = r.position()?;
    // Tail bytes kept from the previous window so a signature split across
    // two reads is still seen
    let mut carried = 0usize;

    loop {
        let n = read_some(r, &mut window[carried..])?;
        if n == 0 {
            return Ok(DescriptorSearch::NotFound);
        }
        let filled = carried + n;

        if let Some(i) = window[..filled]
            .windows(signature.len())
            .position(|w| w == signature)
        {
            let position = base + i as u64;
            r.seek_to(position + signature.len() as u64)?;
            return match read_descriptor_fields(r) {
                Ok(descriptor) => Ok(DescriptorSearch::Found {
                    position,
                    descriptor,
                }),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    Ok(DescriptorSearch::NotFound)
                }
                Err(e) => Err(e.into()),
            };
        }

        let keep = filled.min(signature.len() - 1);
        window.copy_within(filled - keep..filled, 0);
        base += (filled - keep) as u64;
        carried = keep;
    }
}

fn read_descriptor_fields<R: Read + ?Sized>(r: &mut R) -> io::Result<DataDescriptor> {
    Ok(DataDescriptor {
        crc32: r.read_u32::<LittleEndian>()?,
        compressed_size: r.read_u32::<LittleEndian>()?,
        uncompressed_size: r.read_u32::<LittleEndian>()?,
    })
}

fn read_some<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match r.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            result => return result,
        }
    }
}

/// Read the entry name that follows a freshly parsed header into `buf`.
///
/// `buf` is reused across calls and only grows.
pub fn read_name<'a, R: ByteCursor + ?Sized>(
    r: &mut R,
    header: &LocalFileHeader,
    buf: &'a mut Vec<u8>,
) -> Result<&'a [u8]> {
    buf.clear();
    buf.resize(usize::from(header.name_length), 0);
    r.read_exact(buf)?;
    Ok(buf.as_slice())
}

/// Names are decoded lossily so non-UTF-8 names still come through.
pub fn decode_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}
