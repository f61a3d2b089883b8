use chrono::{Months, NaiveDate, NaiveDateTime, TimeDelta};

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: u32 = 0x04034b50;
pub const LFH_SIZE: u64 = 30;

/// Data descriptor - 16 bytes including its signature
pub const DESCRIPTOR_SIGNATURE: u32 = 0x08074b50;
pub const DESCRIPTOR_SIZE: u16 = 16;

/// General purpose flag bits
pub const FLAG_ENCRYPTED: u16 = 1 << 0;
pub const FLAG_STREAMED: u16 = 1 << 3;

/// Fields carried by a trailing data descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataDescriptor {
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
}

/// One parsed local file header.
///
/// Only the fixed part is held here. The name and extra field that follow
/// it are read on demand by whoever needs them (see
/// [`read_name`](super::parser::read_name)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileHeader {
    /// Offset of the header signature within the archive
    pub offset: u64,
    pub version: u16,
    pub flags: u16,
    pub compression_method: CompressionMethod,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    /// Taken from the data descriptor when the entry is streamed
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub name_length: u16,
    pub extra_field_length: u16,
    /// 16 when a trailing data descriptor was located, 0 otherwise
    pub descriptor_length: u16,
}

impl LocalFileHeader {
    /// Sizes and checksum live in a trailing data descriptor (flag bit 3).
    pub fn is_streamed(&self) -> bool {
        self.flags & FLAG_STREAMED != 0
    }

    pub fn is_encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }

    /// Offset of the first payload byte.
    pub fn data_offset(&self) -> u64 {
        self.offset + LFH_SIZE + u64::from(self.name_length) + u64::from(self.extra_field_length)
    }

    /// Distance from the end of the fixed header to the next header.
    pub fn skip_len(&self) -> u64 {
        u64::from(self.compressed_size)
            + u64::from(self.name_length)
            + u64::from(self.extra_field_length)
            + u64::from(self.descriptor_length)
    }

    /// Total bytes occupied by this entry: header, name, extra field,
    /// payload and descriptor.
    pub fn entry_len(&self) -> u64 {
        LFH_SIZE + self.skip_len()
    }

    /// Offset of the header that follows this entry.
    pub fn next_offset(&self) -> u64 {
        self.offset + self.entry_len()
    }

    /// Parse modification date to (year, month, day)
    pub fn mod_date(&self) -> (u16, u8, u8) {
        let day = (self.last_mod_date & 0x1F) as u8;
        let month = ((self.last_mod_date >> 5) & 0x0F) as u8;
        let year = ((self.last_mod_date >> 9) & 0x7F) + 1980;
        (year, month, day)
    }

    /// Parse modification time to (hour, minute, second)
    pub fn mod_time(&self) -> (u8, u8, u8) {
        let second = ((self.last_mod_time & 0x1F) * 2) as u8;
        let minute = ((self.last_mod_time >> 5) & 0x3F) as u8;
        let hour = ((self.last_mod_time >> 11) & 0x1F) as u8;
        (hour, minute, second)
    }

    /// Modification time as a calendar timestamp, without timezone adjustment.
    pub fn modified(&self) -> Option<NaiveDateTime> {
        dos_datetime(self.last_mod_date, self.last_mod_time)
    }
}

/// Decode packed DOS date and time fields.
///
/// Out-of-range fields roll over instead of failing: month 0 is December
/// of the previous year, day 0 the last day of the previous month, and
/// hours past 23 carry into the following day.
pub fn dos_datetime(date: u16, time: u16) -> Option<NaiveDateTime> {
    let year = i32::from(date >> 9) + 1980;
    let month = u32::from((date >> 5) & 0x0F);
    let day = i64::from(date & 0x1F);
    let seconds = i64::from(time & 0x1F) * 2
        + i64::from((time >> 5) & 0x3F) * 60
        + i64::from(time >> 11) * 3600;

    let new_year = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let month_start = if month == 0 {
        new_year.checked_sub_months(Months::new(1))?
    } else {
        new_year.checked_add_months(Months::new(month - 1))?
    };
    let date = month_start.checked_add_signed(TimeDelta::try_days(day - 1)?)?;

    date.and_hms_opt(0, 0, 0)?
        .checked_add_signed(TimeDelta::try_seconds(seconds)?)
}

/// Name matching rules for [`offset_of_name`](super::ZipScanner::offset_of_name).
///
/// Bit 0 selects exact matching (otherwise the pattern may be a substring
/// of the name), bit 1 selects case-sensitive comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchFlags(u8);

impl MatchFlags {
    pub const EXACT: MatchFlags = MatchFlags(0b01);
    pub const CASE_SENSITIVE: MatchFlags = MatchFlags(0b10);
    pub const SUBSTRING_IGNORE_CASE: MatchFlags = MatchFlags(0);
    pub const EXACT_CASE_SENSITIVE: MatchFlags = MatchFlags(0b11);

    /// Unknown bits are dropped.
    pub fn from_bits(bits: u8) -> Self {
        MatchFlags(bits & 0b11)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_exact(self) -> bool {
        self.0 & Self::EXACT.0 != 0
    }

    pub fn is_case_sensitive(self) -> bool {
        self.0 & Self::CASE_SENSITIVE.0 != 0
    }

    pub fn with_exact(self, exact: bool) -> Self {
        if exact {
            MatchFlags(self.0 | Self::EXACT.0)
        } else {
            MatchFlags(self.0 & !Self::EXACT.0)
        }
    }

    pub fn with_case_sensitive(self, case_sensitive: bool) -> Self {
        if case_sensitive {
            MatchFlags(self.0 | Self::CASE_SENSITIVE.0)
        } else {
            MatchFlags(self.0 & !Self::CASE_SENSITIVE.0)
        }
    }

    /// Test an archived name against a pattern.
    ///
    /// In substring mode a pattern as long as the name has to equal it,
    /// still honouring the case rule.
    pub fn matches(self, name: &[u8], pattern: &[u8]) -> bool {
        if self.is_exact() || name.len() == pattern.len() {
            return self.bytes_eq(name, pattern);
        }
        if pattern.len() > name.len() {
            return false;
        }
        if pattern.is_empty() {
            return true;
        }
        name.windows(pattern.len())
            .any(|window| self.bytes_eq(window, pattern))
    }

    fn bytes_eq(self, a: &[u8], b: &[u8]) -> bool {
        if self.is_case_sensitive() {
            a == b
        } else {
            a.eq_ignore_ascii_case(b)
        }
    }
}

impl Default for MatchFlags {
    /// Exact, case-sensitive.
    fn default() -> Self {
        Self::EXACT_CASE_SENSITIVE
    }
}
