//! Fixture writer for summary files
//!
//! Produces the same chunked big-endian record layout the reader consumes,
//! with a configurable chunk size so multi-chunk records get exercised.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub enum Values<'a> {
    Text(&'a [&'a str]),
    Int(&'a [i32]),
    Real(&'a [f32]),
    Mess,
}

pub struct SummaryWriter {
    bytes: Vec<u8>,
    max_chunk_elements: usize,
}

impl SummaryWriter {
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            max_chunk_elements: 1000,
        }
    }

    pub fn with_chunk_elements(mut self, max: usize) -> Self {
        self.max_chunk_elements = max;
        self
    }

    fn chunk(&mut self, payload: &[u8]) {
        let len = (payload.len() as i32).to_be_bytes();
        self.bytes.extend_from_slice(&len);
        self.bytes.extend_from_slice(payload);
        self.bytes.extend_from_slice(&len);
    }

    pub fn record(mut self, name: &str, values: Values<'_>) -> Self {
        let (tag, width, count, raw): (&str, usize, usize, Vec<u8>) = match values {
            Values::Text(v) => (
                "CHAR",
                8,
                v.len(),
                v.iter().flat_map(|s| format!("{:<8}", s).into_bytes()).collect(),
            ),
            Values::Int(v) => ("INTE", 4, v.len(), v.iter().flat_map(|x| x.to_be_bytes()).collect()),
            Values::Real(v) => ("REAL", 4, v.len(), v.iter().flat_map(|x| x.to_be_bytes()).collect()),
            Values::Mess => ("MESS", 0, 0, Vec::new()),
        };

        let mut descriptor = format!("{:<8}", name).into_bytes();
        descriptor.extend_from_slice(&(count as i32).to_be_bytes());
        descriptor.extend_from_slice(tag.as_bytes());
        self.chunk(&descriptor);

        if width > 0 {
            for part in raw.chunks(self.max_chunk_elements * width) {
                self.chunk(part);
            }
        }
        self
    }

    /// Append raw bytes, for corrupting a file on purpose
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn write(self, path: &Path) {
        fs::write(path, self.bytes).unwrap();
    }
}

/// Specification file with date vectors plus the given extra vectors
///
/// Each extra vector is `(keyword, entity, unit, num)`.
pub fn write_spec(path: &Path, extra: &[(&str, &str, &str, i32)]) {
    let mut keywords = vec!["YEAR", "MONTH", "DAY"];
    let mut names = vec![":+:+:+:+"; 3];
    let mut units = vec!["", "", ""];
    let mut nums = vec![0, 0, 0];
    for (keyword, name, unit, num) in extra {
        keywords.push(*keyword);
        names.push(*name);
        units.push(*unit);
        nums.push(*num);
    }

    SummaryWriter::new()
        .with_chunk_elements(4)
        .record("INTEHEAD", Values::Int(&[1, 100]))
        .record("DIMENS", Values::Int(&[keywords.len() as i32, 10, 10, 3, 0, -1]))
        .record("KEYWORDS", Values::Text(&keywords))
        .record("WGNAMES", Values::Text(&names))
        .record("NUMS", Values::Int(&nums))
        .record("UNITS", Values::Text(&units))
        .record("STARTDAT", Values::Int(&[1, 1, 2020]))
        .write(path);
}

/// Data file with one `PARAMS` record per entry of `steps`
pub fn write_data(path: &Path, steps: &[Vec<f32>]) {
    let mut writer = SummaryWriter::new().record("STARTSOL", Values::Mess);
    for (i, values) in steps.iter().enumerate() {
        writer = writer
            .record("SEQHDR", Values::Int(&[i as i32]))
            .record("MINISTEP", Values::Int(&[i as i32]))
            .record("PARAMS", Values::Real(values));
    }
    writer.write(path);
}
