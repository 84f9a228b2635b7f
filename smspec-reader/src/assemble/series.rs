//! Companion data files → value columns

use crate::format::RecordIterator;
use crate::table::{Column, ColumnData, Table};
use crate::types::{Record, ReaderError, Result};
use std::path::Path;

const VALUE_RECORD: &str = "PARAMS";

/// Appends one `PARAMSi` column per `PARAMS` record to a header table
///
/// The column counter is shared across every file fed to the same
/// assembler, so the columns come out numbered in timestep order.
pub struct SeriesAssembler<'a> {
    table: &'a mut Table,
    num_vectors: usize,
    timesteps: usize,
}

impl<'a> SeriesAssembler<'a> {
    /// Start appending to `table`, whose row count fixes the column length
    pub fn new(table: &'a mut Table) -> Self {
        let num_vectors = table.num_rows();
        Self {
            table,
            num_vectors,
            timesteps: 0,
        }
    }

    /// Number of value columns appended so far
    pub fn timesteps(&self) -> usize {
        self.timesteps
    }

    /// Scan one companion file and append its value columns
    pub fn append_file(&mut self, path: &Path) -> Result<usize> {
        log::info!("Reading data file: {:?}", path);
        let appended = self.append_records(RecordIterator::open(path)?)?;
        log::info!("Loaded {} timestep(s) from {:?}", appended, path);
        Ok(appended)
    }

    /// Append a column for every `PARAMS` record in `records`
    pub fn append_records<I>(&mut self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        let mut appended = 0;
        for record in records {
            let record = record?;
            if record.name != VALUE_RECORD {
                continue;
            }

            let name = format!("{}{}", VALUE_RECORD, self.timesteps + 1);
            if record.data.len() != self.num_vectors {
                return Err(ReaderError::ValueColumnLengthMismatch {
                    column: name,
                    expected: self.num_vectors,
                    found: record.data.len(),
                });
            }

            log::debug!("Value column {}", name);
            self.table
                .push_column(Column::new(name, ColumnData::from(record.data)))?;
            self.timesteps += 1;
            appended += 1;
        }
        Ok(appended)
    }
}
