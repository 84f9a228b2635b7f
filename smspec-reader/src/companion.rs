//! Companion data file discovery
//!
//! Data files sit next to the specification file and share its base name:
//! `CASE.SMSPEC` pairs with `CASE.UNSMRY` (unified) or `CASE.S0001`,
//! `CASE.S0002`, ... (split). The lister is a trait so callers can supply
//! their own file set instead of scanning a directory.

use crate::config::ReaderConfig;
use crate::types::Result;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Finds the data files belonging to a specification file
pub trait CompanionLister {
    /// Companion files of `spec_path`, in timestep order
    fn list(&self, spec_path: &Path) -> Result<Vec<PathBuf>>;
}

impl<F> CompanionLister for F
where
    F: Fn(&Path) -> Result<Vec<PathBuf>>,
{
    fn list(&self, spec_path: &Path) -> Result<Vec<PathBuf>> {
        self(spec_path)
    }
}

/// Lists sibling files matching the naming convention, sorted by file name
#[derive(Debug, Clone, Default)]
pub struct DirectoryLister {
    config: ReaderConfig,
}

impl DirectoryLister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ReaderConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Regex matching companion file names for `base`
    ///
    /// Returns `None` when every companion family is disabled.
    pub fn pattern(&self, base: &str) -> Result<Option<Regex>> {
        if self.config.header_only() {
            return Ok(None);
        }

        let mut suffixes = Vec::new();
        if self.config.load_unified {
            suffixes.push(r"(?i:UNSMRY)");
        }
        if self.config.load_split {
            suffixes.push(r"[sS]\d+");
        }
        let pattern = format!(r"^{}\.(?:{})$", regex::escape(base), suffixes.join("|"));
        Ok(Some(Regex::new(&pattern)?))
    }
}

impl CompanionLister for DirectoryLister {
    fn list(&self, spec_path: &Path) -> Result<Vec<PathBuf>> {
        let base = match spec_path.file_stem().and_then(|s| s.to_str()) {
            Some(base) => base,
            None => return Ok(Vec::new()),
        };
        let pattern = match self.pattern(base)? {
            Some(pattern) => pattern,
            None => return Ok(Vec::new()),
        };
        let dir = match spec_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            if let Some(name) = file_name.to_str() {
                if pattern.is_match(name) {
                    files.push(entry.path());
                }
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        log::debug!("Found {} companion file(s) for {:?}", files.len(), spec_path);
        Ok(files)
    }
}
