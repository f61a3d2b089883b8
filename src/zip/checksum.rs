//! Running CRC-32 over produced bytes.

use flate2::Crc;

/// Incremental CRC-32 (ISO-HDLC): seeded with all ones, complemented on
/// [`finalize`](Checksum::finalize).
#[derive(Debug)]
pub struct Checksum {
    crc: Crc,
}

impl Checksum {
    pub fn new() -> Self {
        Self { crc: Crc::new() }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.crc.update(data);
    }

    /// Number of bytes fed so far.
    pub fn amount(&self) -> u32 {
        self.crc.amount()
    }

    pub fn finalize(&self) -> u32 {
        self.crc.sum()
    }
}

impl Default for Checksum {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot CRC-32 of a buffer.
pub fn crc32(data: &[u8]) -> u32 {
    let mut checksum = Checksum::new();
    checksum.update(data);
    checksum.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_check_value() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
        assert_eq!(crc32(b""), 0);
    }

    #[test]
    fn incremental_matches_one_shot() {
        let mut checksum = Checksum::new();
        checksum.update(b"1234");
        checksum.update(b"56789");
        assert_eq!(checksum.finalize(), crc32(b"123456789"));
        assert_eq!(checksum.amount(), 9);
    }
}
