//! Hand-written ZIP bodies for integration tests.
//!
//! Only local file headers are emitted, so tests control every byte the
//! scanner sees: streamed entries, extra fields, bad checksums and trailing
//! garbage.

#![allow(dead_code)]

use std::io::Write;

use flate2::Compression;
use flate2::write::DeflateEncoder;
use lhunzip::zip::{DESCRIPTOR_SIGNATURE, FLAG_STREAMED, LFH_SIGNATURE, crc32};

/// 2024-03-15
pub const DATE: u16 = (44 << 9) | (3 << 5) | 15;
/// 14:30:20
pub const TIME: u16 = (14 << 11) | (30 << 5) | 10;

#[derive(Debug, Clone)]
pub struct Entry<'a> {
    pub name: &'a str,
    pub data: &'a [u8],
    pub deflate: bool,
    pub streamed: bool,
    pub extra: &'a [u8],
    /// Written instead of the real CRC-32
    pub crc: Option<u32>,
}

impl<'a> Entry<'a> {
    pub fn new(name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            data,
            deflate: false,
            streamed: false,
            extra: &[],
            crc: None,
        }
    }

    pub fn deflated(mut self) -> Self {
        self.deflate = true;
        self
    }

    pub fn streamed(mut self) -> Self {
        self.streamed = true;
        self
    }

    pub fn extra(mut self, extra: &'a [u8]) -> Self {
        self.extra = extra;
        self
    }

    pub fn crc(mut self, crc: u32) -> Self {
        self.crc = Some(crc);
        self
    }
}

#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    bytes: Vec<u8>,
    offsets: Vec<u64>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(self, name: &str, data: &[u8]) -> Self {
        self.entry(Entry::new(name, data))
    }

    pub fn deflated(self, name: &str, data: &[u8]) -> Self {
        self.entry(Entry::new(name, data).deflated())
    }

    pub fn entry(mut self, entry: Entry<'_>) -> Self {
        self.offsets.push(self.bytes.len() as u64);

        let payload = if entry.deflate {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(entry.data).unwrap();
            encoder.finish().unwrap()
        } else {
            entry.data.to_vec()
        };
        let crc = entry.crc.unwrap_or_else(|| crc32(entry.data));
        let compressed = payload.len() as u32;
        let uncompressed = entry.data.len() as u32;
        let (flags, method) = (
            if entry.streamed { FLAG_STREAMED } else { 0 },
            if entry.deflate { 8u16 } else { 0 },
        );

        let out = &mut self.bytes;
        out.extend_from_slice(&LFH_SIGNATURE.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&flags.to_le_bytes());
        out.extend_from_slice(&method.to_le_bytes());
        out.extend_from_slice(&TIME.to_le_bytes());
        out.extend_from_slice(&DATE.to_le_bytes());
        let inline = if entry.streamed {
            [0, 0, 0]
        } else {
            [crc, compressed, uncompressed]
        };
        for field in inline {
            out.extend_from_slice(&field.to_le_bytes());
        }
        out.extend_from_slice(&(entry.name.len() as u16).to_le_bytes());
        out.extend_from_slice(&(entry.extra.len() as u16).to_le_bytes());
        out.extend_from_slice(entry.name.as_bytes());
        out.extend_from_slice(entry.extra);
        out.extend_from_slice(&payload);
        if entry.streamed {
            out.extend_from_slice(&DESCRIPTOR_SIGNATURE.to_le_bytes());
            for field in [crc, compressed, uncompressed] {
                out.extend_from_slice(&field.to_le_bytes());
            }
        }

        self
    }

    /// Append bytes that are not a local file header.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Header offsets of the entries added so far.
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}
