//! Summary Result Reader Library
//!
//! Reads reservoir-simulation summary output: a specification file
//! (`CASE.SMSPEC`) declaring which vectors exist, and its companion data
//! files (`CASE.UNSMRY` or `CASE.S0001`, `CASE.S0002`, ...) holding one value
//! snapshot per timestep. Both use the same tagged binary record format.
//!
//! # Architecture
//!
//! - `format` decodes big-endian scalars and chunked, self-describing records
//! - `assemble` turns record streams into header columns and value columns
//! - [`Table`] holds the result as typed, equal-length named columns
//! - [`Dataset`] ties it together and answers queries
//!
//! The library is read-only: it never writes summary files.
//!
//! # Example Usage
//!
//! ```no_run
//! use smspec_reader::Dataset;
//!
//! let dataset = Dataset::open("model/CASE.SMSPEC").unwrap();
//!
//! println!("{} vectors over {} timesteps", dataset.num_vectors(), dataset.num_timesteps());
//! for well in dataset.all_wells() {
//!     println!("well {}", well);
//! }
//!
//! let oil = dataset.select(&["WOPR"], &["PROD1", "PROD2"]).unwrap();
//! for column in oil.columns() {
//!     println!("{}: {} values", column.name(), column.len());
//! }
//! ```

// Public modules
pub mod assemble;
pub mod companion;
pub mod config;
pub mod dataset;
pub mod format;
pub mod table;
pub mod types;

// Re-export main types for convenience
pub use companion::{CompanionLister, DirectoryLister};
pub use config::ReaderConfig;
pub use dataset::{Dataset, DatasetSummary, NO_ENTITY};
pub use table::{Column, ColumnData, Table, HEADER_COLUMNS};
pub use types::{ElementType, Record, RecordData, ReaderError, Result, Timestamp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: an empty table wraps into an empty dataset
        let dataset = Dataset::from_table(Table::default());
        assert_eq!(dataset.num_vectors(), 0);
        assert!(dataset.all_dates().unwrap().is_empty());
    }
}
