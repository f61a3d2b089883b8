//! Decompression backends.
//!
//! The extraction pipeline copies stored entries itself and hands every
//! other entry to a [`Decompressor`], which must both produce the raw bytes
//! and report their CRC-32.

use std::io::{self, Read};

use flate2::CrcWriter;
use flate2::read::DeflateDecoder;

use super::structures::CompressionMethod;
use crate::error::{Result, ZipError};

pub trait Decompressor {
    /// Decompress everything `input` yields into `output`.
    ///
    /// `input` is limited to the entry's compressed bytes. Returns the
    /// CRC-32 of the bytes appended to `output`.
    fn decompress(
        &mut self,
        method: CompressionMethod,
        input: &mut dyn Read,
        output: &mut Vec<u8>,
    ) -> Result<u32>;
}

/// DEFLATE backend built on `flate2`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlateDecompressor;

impl Decompressor for FlateDecompressor {
    fn decompress(
        &mut self,
        method: CompressionMethod,
        input: &mut dyn Read,
        output: &mut Vec<u8>,
    ) -> Result<u32> {
        if method != CompressionMethod::Deflate {
            return Err(ZipError::UnsupportedMethod(method.as_u16()));
        }

        let mut decoder = DeflateDecoder::new(input);
        let mut writer = CrcWriter::new(output);
        io::copy(&mut decoder, &mut writer)?;

        Ok(writer.crc().sum())
    }
}
