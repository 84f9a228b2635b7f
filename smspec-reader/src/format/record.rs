//! Record reader
//!
//! A record is a 16-byte descriptor chunk (name, element count, element type)
//! followed by zero or more data chunks. Every chunk is framed by a 4-byte
//! big-endian length marker before and after its payload:
//!
//! ```text
//! [len=16][NAME    ][count][TYPE][len=16]
//! [len=n0][ n0 bytes of elements ][len=n0]
//! [len=n1][ n1 bytes of elements ][len=n1]
//! ...
//! ```
//!
//! Large records are split across several data chunks, so the reader keeps
//! pulling chunks until the declared element count is reached.

use super::primitive::{decode_double, decode_int, decode_real, decode_text};
use crate::types::{ElementType, Record, RecordData, ReaderError, Result};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

const MARKER_LEN: usize = 4;
const NAME_LEN: usize = 8;
const DESCRIPTOR_LEN: usize = MARKER_LEN + NAME_LEN + 4 + 4 + MARKER_LEN;

/// Read one record starting at `offset`
///
/// Returns the decoded elements, the trimmed record name and the offset
/// immediately after the record's last chunk.
pub fn read_record<R: Read + Seek>(reader: &mut R, offset: u64) -> Result<(RecordData, String, u64)> {
    reader.seek(SeekFrom::Start(offset))?;
    let record = read_next_record(reader)?;
    let next_offset = reader.stream_position()?;
    Ok((record.data, record.name, next_offset))
}

/// Read the record at the reader's current position
pub fn read_next_record<R: Read>(reader: &mut R) -> Result<Record> {
    let mut descriptor = [0u8; DESCRIPTOR_LEN];
    let available = peek_fill(reader, &mut descriptor)?;
    if available < DESCRIPTOR_LEN {
        return Err(truncated_descriptor(&descriptor[..available]));
    }

    let name = decode_text(&descriptor[4..12]);
    let count = decode_int(&descriptor[12..16])?;
    let element_type = ElementType::parse(&decode_text(&descriptor[16..20]))?;

    if count < 0 {
        return Err(ReaderError::InvalidRecord {
            name,
            reason: format!("negative element count {}", count),
        });
    }
    let count = count as usize;
    let width = element_type.width();

    log::trace!("Record {:?}: {} x {}", name, count, element_type);

    if width == 0 {
        if count > 0 {
            return Err(ReaderError::InvalidRecord {
                name,
                reason: format!("{} declares {} elements of width 0", element_type, count),
            });
        }
        return Ok(Record {
            name,
            element_type,
            data: RecordData::Empty,
        });
    }

    let raw = read_chunks(reader, &name, count, width)?;
    let data = decode_elements(element_type, &raw, width)?;

    Ok(Record {
        name,
        element_type,
        data,
    })
}

/// A file that ends inside a descriptor chunk
///
/// Reports whatever name and count made it to disk.
fn truncated_descriptor(partial: &[u8]) -> ReaderError {
    let name = partial.get(4..12).map(decode_text).unwrap_or_default();
    let expected = partial
        .get(12..16)
        .and_then(|b| decode_int(b).ok())
        .map(|count| count.max(0) as usize)
        .unwrap_or(0);
    ReaderError::TruncatedRecord {
        name,
        expected,
        found: 0,
    }
}

/// Collect the raw bytes of `count` elements from consecutive data chunks
///
/// Every chunk must hold a whole number of elements, so the chunk lengths
/// add up to exactly `count * width`.
fn read_chunks<R: Read>(reader: &mut R, name: &str, count: usize, width: usize) -> Result<Vec<u8>> {
    let truncated = |found: usize| ReaderError::TruncatedRecord {
        name: name.to_string(),
        expected: count,
        found,
    };

    let mut raw = Vec::new();
    let mut found = 0usize;

    while found < count {
        let mut marker = [0u8; MARKER_LEN];
        read_or_truncated(reader, &mut marker, || truncated(found))?;
        let chunk_len = decode_int(&marker)?;
        if chunk_len < 0 {
            return Err(ReaderError::InvalidRecord {
                name: name.to_string(),
                reason: format!("negative chunk length {}", chunk_len),
            });
        }
        let chunk_len = chunk_len as usize;
        let elements = chunk_len / width;

        if chunk_len % width != 0 || found + elements > count {
            return Err(truncated(found + elements));
        }

        // sized by what the file actually holds, not by the marker
        let read = reader
            .by_ref()
            .take(chunk_len as u64)
            .read_to_end(&mut raw)?;
        if read != chunk_len {
            return Err(truncated(found + read / width));
        }
        found += elements;

        let mut trailing = [0u8; MARKER_LEN];
        read_or_truncated(reader, &mut trailing, || truncated(found))?;

        log::trace!("  chunk of {} bytes, {}/{} elements", chunk_len, found, count);
    }

    Ok(raw)
}

fn read_or_truncated<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    truncated: impl FnOnce() -> ReaderError,
) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => truncated(),
        _ => ReaderError::Io(e),
    })
}

fn decode_elements(element_type: ElementType, raw: &[u8], width: usize) -> Result<RecordData> {
    let elements = raw.chunks_exact(width);
    let data = match element_type {
        ElementType::Char | ElementType::FixedChar(_) => {
            RecordData::Text(elements.map(decode_text).collect())
        }
        ElementType::Inte => RecordData::Int(elements.map(decode_int).collect::<Result<_>>()?),
        ElementType::Real => RecordData::Real(elements.map(decode_real).collect::<Result<_>>()?),
        ElementType::Doub => {
            RecordData::Double(elements.map(decode_double).collect::<Result<_>>()?)
        }
        ElementType::Logi => RecordData::Logical(
            elements
                .map(|b| decode_int(b).map(|v| v != 0))
                .collect::<Result<_>>()?,
        ),
        ElementType::Mess => RecordData::Empty,
    };
    Ok(data)
}

/// Iterator over every record of a summary file
///
/// Stops cleanly when the next length marker would start at end of file.
/// After the first error the iterator is exhausted.
pub struct RecordIterator<R> {
    reader: R,
    offset: u64,
    done: bool,
}

impl RecordIterator<BufReader<File>> {
    /// Open a summary file for record scanning
    pub fn open(path: &Path) -> Result<Self> {
        log::debug!("Opening summary file: {:?}", path);
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read + Seek> RecordIterator<R> {
    /// Scan records from the start of `reader`
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            offset: 0,
            done: false,
        }
    }

    /// Offset of the next record to be read
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn next_record(&mut self) -> Result<Option<Record>> {
        self.reader.seek(SeekFrom::Start(self.offset))?;

        let mut marker = [0u8; MARKER_LEN];
        let available = peek_fill(&mut self.reader, &mut marker)?;
        if available == 0 {
            return Ok(None);
        }
        if available < MARKER_LEN {
            return Err(ReaderError::TruncatedRecord {
                name: String::new(),
                expected: MARKER_LEN,
                found: available,
            });
        }

        self.reader.seek(SeekFrom::Start(self.offset))?;
        let record = read_next_record(&mut self.reader)?;
        self.offset = self.reader.stream_position()?;
        Ok(Some(record))
    }
}

/// Fill `buf` as far as the input allows, returning the number of bytes read
fn peek_fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

impl<R: Read + Seek> Iterator for RecordIterator<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn chunk(out: &mut Vec<u8>, payload: &[u8]) {
        out.extend_from_slice(&(payload.len() as i32).to_be_bytes());
        out.extend_from_slice(payload);
        out.extend_from_slice(&(payload.len() as i32).to_be_bytes());
    }

    fn descriptor(out: &mut Vec<u8>, name: &str, count: i32, tag: &str) {
        let mut payload = format!("{:<8}", name).into_bytes();
        payload.extend_from_slice(&count.to_be_bytes());
        payload.extend_from_slice(tag.as_bytes());
        chunk(out, &payload);
    }

    fn text(values: &[&str], width: usize) -> Vec<u8> {
        values
            .iter()
            .flat_map(|v| format!("{:<width$}", v, width = width).into_bytes())
            .collect()
    }

    #[test]
    fn test_read_int_record() {
        let mut bytes = Vec::new();
        descriptor(&mut bytes, "NUMS", 3, "INTE");
        let payload: Vec<u8> = [1i32, -2, 300].iter().flat_map(|v| v.to_be_bytes()).collect();
        chunk(&mut bytes, &payload);

        let (data, name, next) = read_record(&mut Cursor::new(&bytes), 0).unwrap();
        assert_eq!(name, "NUMS");
        assert_eq!(data, RecordData::Int(vec![1, -2, 300]));
        assert_eq!(next, bytes.len() as u64);
    }

    #[test]
    fn test_record_split_across_chunks() {
        let mut bytes = Vec::new();
        descriptor(&mut bytes, "KEYWORDS", 3, "CHAR");
        chunk(&mut bytes, &text(&["TIME", "YEAR"], 8));
        chunk(&mut bytes, &text(&["WOPR"], 8));

        let (data, name, next) = read_record(&mut Cursor::new(&bytes), 0).unwrap();
        assert_eq!(name, "KEYWORDS");
        assert_eq!(
            data,
            RecordData::Text(vec!["TIME".into(), "YEAR".into(), "WOPR".into()])
        );
        assert_eq!(next, bytes.len() as u64);
    }

    #[test]
    fn test_read_at_offset() {
        let mut bytes = Vec::new();
        descriptor(&mut bytes, "FIRST", 1, "REAL");
        chunk(&mut bytes, &1.5f32.to_be_bytes());
        let second = bytes.len() as u64;
        descriptor(&mut bytes, "SECOND", 1, "DOUB");
        chunk(&mut bytes, &2.25f64.to_be_bytes());

        let (data, name, next) = read_record(&mut Cursor::new(&bytes), second).unwrap();
        assert_eq!(name, "SECOND");
        assert_eq!(data, RecordData::Double(vec![2.25]));
        assert_eq!(next, bytes.len() as u64);
    }

    #[test]
    fn test_fixed_width_text_record() {
        let mut bytes = Vec::new();
        descriptor(&mut bytes, "LGRNAMES", 2, "C016");
        chunk(&mut bytes, &text(&["LONG-WELL-NAME-1", "SHORT"], 16));

        let (data, _, _) = read_record(&mut Cursor::new(&bytes), 0).unwrap();
        assert_eq!(
            data,
            RecordData::Text(vec!["LONG-WELL-NAME-1".into(), "SHORT".into()])
        );
    }

    #[test]
    fn test_mess_record_has_no_chunks() {
        let mut bytes = Vec::new();
        descriptor(&mut bytes, "STARTSOL", 0, "MESS");
        let end_of_mess = bytes.len() as u64;
        descriptor(&mut bytes, "NUMS", 1, "INTE");
        chunk(&mut bytes, &7i32.to_be_bytes());

        let (data, name, next) = read_record(&mut Cursor::new(&bytes), 0).unwrap();
        assert_eq!(name, "STARTSOL");
        assert_eq!(data, RecordData::Empty);
        assert_eq!(next, end_of_mess);
    }

    #[test]
    fn test_logical_record() {
        let mut bytes = Vec::new();
        descriptor(&mut bytes, "LOGIHEAD", 3, "LOGI");
        let payload: Vec<u8> = [0i32, -1, 1].iter().flat_map(|v| v.to_be_bytes()).collect();
        chunk(&mut bytes, &payload);

        let (data, _, _) = read_record(&mut Cursor::new(&bytes), 0).unwrap();
        assert_eq!(data, RecordData::Logical(vec![false, true, true]));
    }

    #[test]
    fn test_truncated_record() {
        let mut bytes = Vec::new();
        descriptor(&mut bytes, "PARAMS", 4, "REAL");
        let payload: Vec<u8> = [1.0f32, 2.0].iter().flat_map(|v| v.to_be_bytes()).collect();
        chunk(&mut bytes, &payload);

        let err = read_record(&mut Cursor::new(&bytes), 0).unwrap_err();
        assert!(matches!(
            err,
            ReaderError::TruncatedRecord { expected: 4, found: 2, .. }
        ));
    }

    #[test]
    fn test_chunks_exceeding_declared_count() {
        let mut bytes = Vec::new();
        descriptor(&mut bytes, "NUMS", 1, "INTE");
        let payload: Vec<u8> = [1i32, 2].iter().flat_map(|v| v.to_be_bytes()).collect();
        chunk(&mut bytes, &payload);

        let err = read_record(&mut Cursor::new(&bytes), 0).unwrap_err();
        assert!(matches!(
            err,
            ReaderError::TruncatedRecord { expected: 1, found: 2, .. }
        ));
    }

    #[test]
    fn test_unknown_element_type() {
        let mut bytes = Vec::new();
        descriptor(&mut bytes, "BOGUS", 1, "QQQQ");
        chunk(&mut bytes, &[0; 4]);

        let err = read_record(&mut Cursor::new(&bytes), 0).unwrap_err();
        assert!(matches!(err, ReaderError::UnknownElementType(tag) if tag == "QQQQ"));
    }

    #[test]
    fn test_iterator_scans_all_records() {
        let mut bytes = Vec::new();
        descriptor(&mut bytes, "SEQHDR", 1, "INTE");
        chunk(&mut bytes, &0i32.to_be_bytes());
        descriptor(&mut bytes, "MINISTEP", 1, "INTE");
        chunk(&mut bytes, &1i32.to_be_bytes());
        descriptor(&mut bytes, "PARAMS", 2, "REAL");
        let payload: Vec<u8> = [1.0f32, 2.0].iter().flat_map(|v| v.to_be_bytes()).collect();
        chunk(&mut bytes, &payload);

        let names: Vec<String> = RecordIterator::new(Cursor::new(bytes))
            .map(|r| r.unwrap().name)
            .collect();
        assert_eq!(names, vec!["SEQHDR", "MINISTEP", "PARAMS"]);
    }

    #[test]
    fn test_iterator_partial_marker() {
        let mut bytes = Vec::new();
        descriptor(&mut bytes, "SEQHDR", 1, "INTE");
        chunk(&mut bytes, &0i32.to_be_bytes());
        bytes.extend_from_slice(&[0, 0]);

        let results: Vec<_> = RecordIterator::new(Cursor::new(bytes)).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ReaderError::TruncatedRecord { .. })));
    }

    #[test]
    fn test_iterator_empty_input() {
        let mut iter = RecordIterator::new(Cursor::new(Vec::<u8>::new()));
        assert!(iter.next().is_none());
        assert_eq!(iter.offset(), 0);
    }

    #[test]
    fn test_ragged_chunk_rejected() {
        let mut bytes = Vec::new();
        descriptor(&mut bytes, "NUMS", 2, "INTE");
        let mut payload: Vec<u8> = [1i32, 2].iter().flat_map(|v| v.to_be_bytes()).collect();
        payload.extend_from_slice(&[0, 0]);
        chunk(&mut bytes, &payload);

        let err = read_record(&mut Cursor::new(&bytes), 0).unwrap_err();
        assert!(matches!(
            err,
            ReaderError::TruncatedRecord { ref name, expected: 2, .. } if name == "NUMS"
        ));
    }

    #[test]
    fn test_chunk_lengths_must_total_count_times_width() {
        // 6 + 6 bytes reaches 3 INTE elements only by rounding each chunk down
        let mut bytes = Vec::new();
        descriptor(&mut bytes, "NUMS", 3, "INTE");
        chunk(&mut bytes, &[0, 0, 0, 1, 0, 0]);
        chunk(&mut bytes, &[0, 2, 0, 0, 0, 3]);

        let err = read_record(&mut Cursor::new(&bytes), 0).unwrap_err();
        assert!(matches!(err, ReaderError::TruncatedRecord { expected: 3, .. }));
    }

    #[test]
    fn test_file_ends_inside_descriptor() {
        let mut bytes = Vec::new();
        descriptor(&mut bytes, "SEQHDR", 1, "INTE");
        chunk(&mut bytes, &0i32.to_be_bytes());
        bytes.extend_from_slice(&16i32.to_be_bytes());
        bytes.extend_from_slice(b"PARAMS  ");

        let results: Vec<_> = RecordIterator::new(Cursor::new(bytes)).collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[1],
            Err(ReaderError::TruncatedRecord { ref name, expected: 0, found: 0 }) if name == "PARAMS"
        ));
    }

    #[test]
    fn test_oversized_chunk_marker_in_short_file() {
        let mut bytes = Vec::new();
        descriptor(&mut bytes, "NUMS", 500_000_000, "INTE");
        bytes.extend_from_slice(&2_000_000_000i32.to_be_bytes());

        let err = read_record(&mut Cursor::new(&bytes), 0).unwrap_err();
        assert!(matches!(
            err,
            ReaderError::TruncatedRecord { expected: 500_000_000, found: 0, .. }
        ));
    }
}
