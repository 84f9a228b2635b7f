//! Reader configuration types
//!
//! Controls which companion files are picked up next to a specification
//! file. Everything else about decoding is dictated by the file format.

use serde::{Deserialize, Serialize};

/// Configuration for opening a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Load the unified data file (`<base>.UNSMRY`)
    #[serde(default = "default_true")]
    pub load_unified: bool,

    /// Load split data files (`<base>.S0001`, `<base>.S0002`, ...)
    #[serde(default = "default_true")]
    pub load_split: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            load_unified: true,
            load_split: true,
        }
    }
}

impl ReaderConfig {
    /// Create a new reader configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: enable or disable the unified data file
    pub fn with_unified(mut self, enabled: bool) -> Self {
        self.load_unified = enabled;
        self
    }

    /// Builder method: enable or disable split data files
    pub fn with_split(mut self, enabled: bool) -> Self {
        self.load_split = enabled;
        self
    }

    /// True if no companion file family is enabled
    pub fn header_only(&self) -> bool {
        !self.load_unified && !self.load_split
    }
}
