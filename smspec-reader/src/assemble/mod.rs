//! Table assembly from decoded records
//!
//! The header assembler turns a specification file into the vector-identity
//! columns; the series assembler appends one value column per `PARAMS`
//! record found in the companion data files.

pub mod header;
pub mod series;

pub use header::{assemble_header, read_header};
pub use series::SeriesAssembler;
