//! Specification file → header columns

use crate::format::RecordIterator;
use crate::table::{Column, ColumnData, Table, HEADER_COLUMNS};
use crate::types::{Record, ReaderError, Result};
use std::path::Path;

/// Read the header columns of a specification file
pub fn read_header(path: &Path) -> Result<Table> {
    log::info!("Reading specification file: {:?}", path);
    let table = assemble_header(RecordIterator::open(path)?)?;
    log::info!("Specification declares {} vectors", table.num_rows());
    Ok(table)
}

/// Build the `KEYWORDS`, `UNITS`, `NUMS`, `WGNAMES` table from a record stream
///
/// `NAMES` is an older spelling of `WGNAMES` and lands in the same column.
/// Unrelated records are skipped.
pub fn assemble_header<I>(records: I) -> Result<Table>
where
    I: IntoIterator<Item = Result<Record>>,
{
    let mut slots: [Option<ColumnData>; 4] = Default::default();

    for record in records {
        let record = record?;
        let name = match record.name.as_str() {
            "NAMES" => "WGNAMES",
            other => other,
        };
        let Some(slot) = HEADER_COLUMNS.iter().position(|c| *c == name) else {
            continue;
        };

        if record.element_type.is_text() != (name != "NUMS") {
            return Err(ReaderError::InvalidRecord {
                name: record.name,
                reason: format!("unexpected element type {}", record.element_type),
            });
        }

        log::debug!(
            "Header record {} ({} elements, {})",
            record.name,
            record.data.len(),
            record.element_type
        );
        if slots[slot].is_some() {
            log::warn!("Header column {} appears more than once; keeping the last", name);
        }
        slots[slot] = Some(ColumnData::from(record.data));
    }

    let mut columns = Vec::with_capacity(HEADER_COLUMNS.len());
    for (name, slot) in HEADER_COLUMNS.iter().zip(slots) {
        let data = slot.ok_or_else(|| ReaderError::MissingHeaderColumn(name.to_string()))?;
        columns.push(Column::new(*name, data));
    }

    let expected = columns[0].len();
    if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
        return Err(ReaderError::HeaderLengthMismatch {
            column: bad.name().to_string(),
            expected,
            found: bad.len(),
        });
    }

    Table::new(columns)
}
