//! Binary summary file format
//!
//! `primitive` decodes fixed-width big-endian scalars and padded text,
//! `record` reads whole self-describing records on top of it.

pub mod primitive;
pub mod record;

pub use primitive::{decode_double, decode_int, decode_real, decode_text};
pub use record::{read_next_record, read_record, RecordIterator};
