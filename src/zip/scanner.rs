//! Header-by-header walks over an archive body.
//!
//! Every operation opens its own cursor from the [`ArchiveSource`], starts
//! at the first header (or a given offset) and hops from one local file
//! header to the next using the lengths the header declares. A position
//! that does not parse as a header ends the walk.

use chrono::NaiveDateTime;
use tracing::{debug, trace, warn};

use super::extractor::{ExtractedEntry, ZipExtractor};
use super::inflate::{Decompressor, FlateDecompressor};
use super::parser::{decode_name, parse_header, read_name};
use super::structures::{LocalFileHeader, MatchFlags};
use crate::error::{Result, ZipError};
use crate::io::{ArchiveSource, ByteCursor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning,
    Found(u64),
    /// No header at the current position: the normal end of the body.
    Exhausted,
    /// A streamed entry whose descriptor never showed up.
    Corrupt,
}

impl ScanState {
    fn found(self) -> Option<u64> {
        match self {
            ScanState::Found(offset) => Some(offset),
            _ => None,
        }
    }
}

enum Step {
    Entry(LocalFileHeader),
    Stop(ScanState),
}

/// Parse the header at the cursor, turning end-of-body errors into a
/// terminal state. Other errors propagate.
fn step<R: ByteCursor + ?Sized>(r: &mut R) -> Result<Step> {
    match parse_header(r) {
        Ok(header) => Ok(Step::Entry(header)),
        Err(e) => Ok(Step::Stop(stop_state(e)?)),
    }
}

fn stop_state(err: ZipError) -> Result<ScanState> {
    if !err.ends_scan() {
        return Err(err);
    }
    if err.is_corrupt() {
        warn!("scan stopped on a corrupt entry: {err}");
        Ok(ScanState::Corrupt)
    } else {
        trace!("scan stopped: {err}");
        Ok(ScanState::Exhausted)
    }
}

/// A header seen while listing an archive.
#[derive(Debug, Clone)]
pub struct EntryInfo {
    pub offset: u64,
    pub name: String,
    pub header: LocalFileHeader,
}

impl EntryInfo {
    /// Directory entries end with '/'
    pub fn is_directory(&self) -> bool {
        self.name.ends_with('/')
    }
}

/// Reads an archive through its local file headers only.
///
/// ## Example
///
/// ```no_run
/// use lhunzip::{LocalArchive, MatchFlags, ZipScanner};
///
/// # fn main() -> lhunzip::Result<()> {
/// let mut scanner = ZipScanner::new(LocalArchive::new("document.odt"));
/// if let Some(entry) = scanner.extract_by_name("content.xml", MatchFlags::default())? {
///     println!("{} bytes, verified: {}", entry.data.len(), entry.verified);
/// }
/// # Ok(())
/// # }
/// ```
pub struct ZipScanner<S, D = FlateDecompressor> {
    source: S,
    extractor: ZipExtractor<D>,
}

impl<S: ArchiveSource> ZipScanner<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            extractor: ZipExtractor::new(),
        }
    }
}

impl<S: ArchiveSource, D: Decompressor> ZipScanner<S, D> {
    pub fn with_decompressor(source: S, decompressor: D) -> Self {
        Self {
            source,
            extractor: ZipExtractor::with_decompressor(decompressor),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of consecutive valid headers from the start of the archive.
    pub fn count_entries(&self) -> Result<usize> {
        let mut r = self.source.open()?;
        let mut count = 0;
        let mut state = ScanState::Scanning;

        while state == ScanState::Scanning {
            match step(&mut r)? {
                Step::Entry(header) => {
                    trace!(offset = header.offset, skip = header.skip_len(), "counting entry");
                    r.skip(header.skip_len())?;
                    count += 1;
                }
                Step::Stop(end) => state = end,
            }
        }

        debug!(count, ?state, "counted entries");
        Ok(count)
    }

    /// Offset of the header of the `index`-th entry (0-based).
    pub fn offset_of_index(&self, index: usize) -> Result<Option<u64>> {
        let mut r = self.source.open()?;
        let mut seen = 0;
        let mut state = ScanState::Scanning;

        while state == ScanState::Scanning {
            let offset = r.position()?;
            match step(&mut r)? {
                Step::Entry(_) if seen == index => state = ScanState::Found(offset),
                Step::Entry(header) => {
                    r.skip(header.skip_len())?;
                    seen += 1;
                }
                Step::Stop(end) => state = end,
            }
        }

        Ok(state.found())
    }

    /// Offset of the first header whose name matches `pattern`.
    ///
    /// With `after` set, the walk starts at that offset and only headers
    /// strictly after it are eligible, which lets callers iterate over all
    /// matches.
    pub fn offset_of_name(
        &self,
        pattern: impl AsRef<[u8]>,
        flags: MatchFlags,
        after: Option<u64>,
    ) -> Result<Option<u64>> {
        let pattern = pattern.as_ref();
        let mut r = self.source.open()?;
        if let Some(start) = after {
            r.seek_to(start)?;
        }

        // Grown as needed, shared by every header of this walk
        let mut name = Vec::new();
        let mut state = ScanState::Scanning;

        while state == ScanState::Scanning {
            let offset = r.position()?;
            let header = match step(&mut r)? {
                Step::Entry(header) => header,
                Step::Stop(end) => {
                    state = end;
                    continue;
                }
            };

            if after.is_none_or(|start| offset > start) {
                match read_name(&mut r, &header, &mut name) {
                    Ok(candidate) if flags.matches(candidate, pattern) => {
                        state = ScanState::Found(offset);
                        continue;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        state = stop_state(e)?;
                        continue;
                    }
                }
            }

            r.seek_to(header.next_offset())?;
        }

        debug!(
            pattern = %String::from_utf8_lossy(pattern),
            flags = flags.bits(),
            ?state,
            "name search finished"
        );
        Ok(state.found())
    }

    /// The header at `offset`, if one is there.
    pub fn header_at(&self, offset: u64) -> Result<Option<LocalFileHeader>> {
        let mut r = self.source.open()?;
        r.seek_to(offset)?;
        match step(&mut r)? {
            Step::Entry(header) => Ok(Some(header)),
            Step::Stop(_) => Ok(None),
        }
    }

    pub fn name_of(&self, offset: u64) -> Result<Option<String>> {
        let mut r = self.source.open()?;
        r.seek_to(offset)?;
        let header = match step(&mut r)? {
            Step::Entry(header) => header,
            Step::Stop(_) => return Ok(None),
        };

        let mut name = Vec::new();
        match read_name(&mut r, &header, &mut name) {
            Ok(name) => Ok(Some(decode_name(name))),
            Err(e) => stop_state(e).map(|_| None),
        }
    }

    /// Declared uncompressed size of the entry at `offset`.
    pub fn size_of(&self, offset: u64) -> Result<Option<u32>> {
        Ok(self.header_at(offset)?.map(|h| h.uncompressed_size))
    }

    /// Modification time of the entry at `offset`, as stored (no timezone).
    pub fn modtime_of(&self, offset: u64) -> Result<Option<NaiveDateTime>> {
        Ok(self.header_at(offset)?.and_then(|h| h.modified()))
    }

    /// Every entry from the start of the archive, in order.
    pub fn entries(&self) -> Result<Vec<EntryInfo>> {
        let mut r = self.source.open()?;
        let mut entries = Vec::new();
        let mut name = Vec::new();
        let mut state = ScanState::Scanning;

        while state == ScanState::Scanning {
            let header = match step(&mut r)? {
                Step::Entry(header) => header,
                Step::Stop(end) => {
                    state = end;
                    continue;
                }
            };

            match read_name(&mut r, &header, &mut name) {
                Ok(raw) => {
                    let entry_name = decode_name(raw);
                    r.seek_to(header.next_offset())?;
                    entries.push(EntryInfo {
                        offset: header.offset,
                        name: entry_name,
                        header,
                    });
                }
                Err(e) => state = stop_state(e)?,
            }
        }

        Ok(entries)
    }

    /// Extract the entry whose header starts at `offset`.
    pub fn extract_at(&mut self, offset: u64) -> Result<ExtractedEntry> {
        let mut r = self.source.open()?;
        r.seek_to(offset)?;
        self.extractor.extract(&mut r)
    }

    /// Find the first entry matching `pattern` and extract it.
    pub fn extract_by_name(
        &mut self,
        pattern: impl AsRef<[u8]>,
        flags: MatchFlags,
    ) -> Result<Option<ExtractedEntry>> {
        match self.offset_of_name(pattern, flags, None)? {
            Some(offset) => self.extract_at(offset).map(Some),
            None => Ok(None),
        }
    }

    pub fn extract_by_index(&mut self, index: usize) -> Result<Option<ExtractedEntry>> {
        match self.offset_of_index(index)? {
            Some(offset) => self.extract_at(offset).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryArchive;
    use crate::zip::checksum::crc32;
    use crate::zip::structures::{DESCRIPTOR_SIGNATURE, FLAG_STREAMED, LFH_SIGNATURE};

    fn entry(name: &str, data: &[u8], flags: u16) -> Vec<u8> {
        let streamed = flags & FLAG_STREAMED != 0;
        let crc = crc32(data);
        let len = data.len() as u32;

        let mut out = Vec::new();
        out.extend_from_slice(&LFH_SIGNATURE.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&flags.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0x5821u16.to_le_bytes());
        let inline = if streamed { [0, 0, 0] } else { [crc, len, len] };
        for field in inline {
            out.extend_from_slice(&field.to_le_bytes());
        }
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(data);
        if streamed {
            out.extend_from_slice(&DESCRIPTOR_SIGNATURE.to_le_bytes());
            for field in [crc, len, len] {
                out.extend_from_slice(&field.to_le_bytes());
            }
        }
        out
    }

    fn scanner(parts: &[Vec<u8>]) -> ZipScanner<MemoryArchive> {
        ZipScanner::new(MemoryArchive::new(parts.concat()))
    }

    #[test]
    fn empty_archive() {
        let s = scanner(&[]);
        assert_eq!(s.count_entries().unwrap(), 0);
        assert_eq!(s.offset_of_index(0).unwrap(), None);
        assert_eq!(
            s.offset_of_name("a", MatchFlags::default(), None).unwrap(),
            None
        );
        assert!(s.entries().unwrap().is_empty());
    }

    #[test]
    fn index_walk_agrees_with_count() {
        let s = scanner(&[
            entry("one", b"1", 0),
            entry("two", b"22", FLAG_STREAMED),
            entry("three", b"333", 0),
        ]);

        let count = s.count_entries().unwrap();
        assert_eq!(count, 3);
        let offsets: Vec<u64> = (0..)
            .map_while(|i| s.offset_of_index(i).unwrap())
            .collect();
        assert_eq!(offsets.len(), count);
        assert_eq!(offsets[0], 0);
        assert_eq!(s.name_of(offsets[2]).unwrap().as_deref(), Some("three"));
    }

    #[test]
    fn after_offset_skips_earlier_matches() {
        let s = scanner(&[
            entry("dir/a.xml", b"a", 0),
            entry("dir/b.xml", b"b", 0),
            entry("c.txt", b"c", 0),
        ]);
        let flags = MatchFlags::CASE_SENSITIVE;

        let first = s.offset_of_name(".xml", flags, None).unwrap().unwrap();
        let second = s.offset_of_name(".xml", flags, Some(first)).unwrap().unwrap();
        assert!(second > first);
        assert_eq!(s.name_of(second).unwrap().as_deref(), Some("dir/b.xml"));
        assert_eq!(s.offset_of_name(".xml", flags, Some(second)).unwrap(), None);
    }

    #[test]
    fn lookups_at_non_header_offset() {
        let s = scanner(&[entry("a.txt", b"abcd", 0)]);
        assert_eq!(s.name_of(3).unwrap(), None);
        assert_eq!(s.size_of(3).unwrap(), None);
        assert_eq!(s.modtime_of(3).unwrap(), None);
        assert_eq!(s.size_of(0).unwrap(), Some(4));
        assert!(s.modtime_of(0).unwrap().is_some());
    }

    #[test]
    fn corrupt_streamed_entry_ends_every_walk() {
        let mut broken = entry("s.bin", b"data", FLAG_STREAMED);
        broken.truncate(broken.len() - 16);
        let s = scanner(&[entry("ok.txt", b"ok", 0), broken]);

        assert_eq!(s.count_entries().unwrap(), 1);
        assert_eq!(s.offset_of_index(1).unwrap(), None);
        assert_eq!(
            s.offset_of_name("s.bin", MatchFlags::default(), None).unwrap(),
            None
        );
        assert_eq!(s.entries().unwrap().len(), 1);
    }

    #[test]
    fn truncated_name_ends_search() {
        let mut part = entry("long-name.txt", b"", 0);
        part.truncate(34);
        let s = scanner(&[part]);
        assert_eq!(
            s.offset_of_name("long", MatchFlags::CASE_SENSITIVE, None).unwrap(),
            None
        );
        assert_eq!(s.name_of(0).unwrap(), None);
    }

    #[test]
    fn extract_helpers() {
        let mut s = scanner(&[entry("a.txt", b"abcd", 0), entry("B.TXT", b"wxyz", 0)]);

        let by_name = s
            .extract_by_name("b.txt", MatchFlags::EXACT)
            .unwrap()
            .unwrap();
        assert_eq!(by_name.data, b"wxyz");

        let by_index = s.extract_by_index(0).unwrap().unwrap();
        assert_eq!(by_index.name, "a.txt");
        assert!(s.extract_by_index(2).unwrap().is_none());
        assert!(matches!(
            s.extract_at(1),
            Err(ZipError::NotAnArchiveEntry { offset: 1 })
        ));
    }
}
