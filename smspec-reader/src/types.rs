//! Core types for the summary reader library
//!
//! This module defines the record-level types produced by the binary decoder
//! and the error type shared by every stage of dataset construction.

use chrono::NaiveDate;
use std::fmt;

/// Calendar date of one timestep
pub type Timestamp = NaiveDate;

/// Result type for reader operations
pub type Result<T> = std::result::Result<T, ReaderError>;

/// Errors that can occur while decoding or querying a dataset
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error("Truncated record {name:?}: expected {expected} elements, found {found}")]
    TruncatedRecord {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Unknown element type: {0:?}")]
    UnknownElementType(String),

    #[error("Invalid record {name:?}: {reason}")]
    InvalidRecord { name: String, reason: String },

    #[error("Invalid byte width: expected {expected}, got {found}")]
    InvalidWidth { expected: usize, found: usize },

    #[error("Missing header column: {0}")]
    MissingHeaderColumn(String),

    #[error("Header column {column} has {found} rows, expected {expected}")]
    HeaderLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Value column {column} has {found} rows, expected {expected}")]
    ValueColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Column {column} has {found} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Missing date component: {0}")]
    MissingDateComponent(String),

    #[error("Invalid date in {column}: {year}-{month}-{day}")]
    InvalidDate {
        column: String,
        year: f64,
        month: f64,
        day: f64,
    },

    #[error("Invalid file name pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Element type tag of a record
///
/// The tag is a 4-character field in the record descriptor. `C0nn` is a
/// fixed-width text type whose width is the two-digit decimal `nn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Char,
    Inte,
    Real,
    Doub,
    Logi,
    Mess,
    FixedChar(usize),
}

impl ElementType {
    /// Resolve a decoded type tag
    pub fn parse(tag: &str) -> Result<Self> {
        match tag {
            "CHAR" => Ok(ElementType::Char),
            "INTE" => Ok(ElementType::Inte),
            "REAL" => Ok(ElementType::Real),
            "DOUB" => Ok(ElementType::Doub),
            "LOGI" => Ok(ElementType::Logi),
            "MESS" => Ok(ElementType::Mess),
            _ => {
                let width = tag
                    .strip_prefix("C0")
                    .filter(|digits| digits.len() == 2 && digits.bytes().all(|b| b.is_ascii_digit()))
                    .and_then(|digits| digits.parse::<usize>().ok())
                    .ok_or_else(|| ReaderError::UnknownElementType(tag.to_string()))?;
                Ok(ElementType::FixedChar(width))
            }
        }
    }

    /// Size in bytes of one element on disk
    pub fn width(&self) -> usize {
        match self {
            ElementType::Char => 8,
            ElementType::Inte | ElementType::Real | ElementType::Logi => 4,
            ElementType::Doub => 8,
            ElementType::Mess => 0,
            ElementType::FixedChar(width) => *width,
        }
    }

    /// True for `CHAR` and `C0nn`
    pub fn is_text(&self) -> bool {
        matches!(self, ElementType::Char | ElementType::FixedChar(_))
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Char => write!(f, "CHAR"),
            ElementType::Inte => write!(f, "INTE"),
            ElementType::Real => write!(f, "REAL"),
            ElementType::Doub => write!(f, "DOUB"),
            ElementType::Logi => write!(f, "LOGI"),
            ElementType::Mess => write!(f, "MESS"),
            ElementType::FixedChar(width) => write!(f, "C{:03}", width),
        }
    }
}

/// Decoded elements of one record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordData {
    /// `CHAR` and `C0nn` elements, right-trimmed
    Text(Vec<String>),
    Int(Vec<i32>),
    Real(Vec<f32>),
    Double(Vec<f64>),
    /// `LOGI` elements, decoded as integers (non-zero is true)
    Logical(Vec<bool>),
    /// `MESS` records carry no elements
    Empty,
}

impl RecordData {
    /// Number of decoded elements
    pub fn len(&self) -> usize {
        match self {
            RecordData::Text(v) => v.len(),
            RecordData::Int(v) => v.len(),
            RecordData::Real(v) => v.len(),
            RecordData::Double(v) => v.len(),
            RecordData::Logical(v) => v.len(),
            RecordData::Empty => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One decoded record from a summary file
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Record name, right-trimmed (e.g. "KEYWORDS", "PARAMS")
    pub name: String,
    /// Declared element type
    pub element_type: ElementType,
    /// Decoded elements
    pub data: RecordData,
}
