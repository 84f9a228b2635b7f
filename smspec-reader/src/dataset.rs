//! Main dataset API
//!
//! [`Dataset`] is the entry point of the library. Opening a dataset reads
//! the specification file, discovers and reads its companion data files, and
//! keeps the assembled table. All queries are read-only views over it.

use crate::assemble::{read_header, SeriesAssembler};
use crate::companion::{CompanionLister, DirectoryLister};
use crate::config::ReaderConfig;
use crate::table::{Column, ColumnData, Table};
use crate::types::{ReaderError, Result, Timestamp};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// Entity name used for vectors that belong to no well or group
pub const NO_ENTITY: &str = ":+:+:+:+";

/// A fully loaded summary dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    path: PathBuf,
    companion_files: Vec<PathBuf>,
    table: Table,
}

/// Size information about a loaded dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub path: PathBuf,
    pub vectors: usize,
    pub timesteps: usize,
    pub companion_files: usize,
    pub keywords: usize,
}

impl Dataset {
    /// Open a specification file and every companion data file next to it
    ///
    /// # Example
    /// ```no_run
    /// use smspec_reader::Dataset;
    ///
    /// let dataset = Dataset::open("model/CASE.SMSPEC").unwrap();
    /// let rates = dataset.select(&["WOPR"], &["PROD1"]).unwrap();
    /// println!("{} timesteps", rates.num_rows());
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, &ReaderConfig::default())
    }

    /// Open a dataset, choosing companion file families from `config`
    pub fn open_with_config(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<Self> {
        Self::open_with_lister(path, &DirectoryLister::from_config(config))
    }

    /// Open a dataset, taking the companion files from `lister`
    pub fn open_with_lister(path: impl AsRef<Path>, lister: &dyn CompanionLister) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Opening dataset: {:?}", path);

        let mut table = read_header(path)?;
        let companion_files = lister.list(path)?;
        if companion_files.is_empty() {
            log::warn!("No data files found for {:?}", path);
        }

        let mut assembler = SeriesAssembler::new(&mut table);
        for file in &companion_files {
            assembler.append_file(file)?;
        }
        log::info!(
            "Dataset loaded: {} vectors, {} timesteps",
            table.num_rows(),
            table.value_columns().count()
        );

        Ok(Self {
            path: path.to_path_buf(),
            companion_files,
            table,
        })
    }

    /// Wrap an already assembled table
    pub fn from_table(table: Table) -> Self {
        Self {
            path: PathBuf::new(),
            companion_files: Vec::new(),
            table,
        }
    }

    /// The full table: header columns followed by one column per timestep
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Specification file this dataset was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data files that contributed value columns, in load order
    pub fn companion_files(&self) -> &[PathBuf] {
        &self.companion_files
    }

    pub fn num_vectors(&self) -> usize {
        self.table.num_rows()
    }

    pub fn num_timesteps(&self) -> usize {
        self.table.value_columns().count()
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            path: self.path().to_path_buf(),
            vectors: self.num_vectors(),
            timesteps: self.num_timesteps(),
            companion_files: self.companion_files.len(),
            keywords: self.all_keywords().len(),
        }
    }

    fn text_column(&self, name: &str) -> &[String] {
        self.table
            .column(name)
            .and_then(|c| c.data().as_text())
            .unwrap_or(&[])
    }

    fn keywords(&self) -> &[String] {
        self.text_column("KEYWORDS")
    }

    fn entity_names(&self) -> &[String] {
        self.text_column("WGNAMES")
    }

    fn row_of(&self, keyword: &str) -> Result<usize> {
        self.keywords()
            .iter()
            .position(|k| k == keyword)
            .ok_or_else(|| ReaderError::MissingDateComponent(keyword.to_string()))
    }

    /// Calendar date of every timestep, in column order
    pub fn all_dates(&self) -> Result<Vec<Timestamp>> {
        let columns: Vec<&Column> = self.table.value_columns().collect();
        if columns.is_empty() {
            return Ok(Vec::new());
        }

        let year_row = self.row_of("YEAR")?;
        let month_row = self.row_of("MONTH")?;
        let day_row = self.row_of("DAY")?;

        columns
            .into_iter()
            .map(|column| {
                let component = |row: usize, label: &str| {
                    column.data().get_f64(row).ok_or_else(|| {
                        ReaderError::MissingDateComponent(format!("{} in {}", label, column.name()))
                    })
                };
                let year = component(year_row, "YEAR")?;
                let month = component(month_row, "MONTH")?;
                let day = component(day_row, "DAY")?;

                to_date(year, month, day).ok_or_else(|| ReaderError::InvalidDate {
                    column: column.name().to_string(),
                    year,
                    month,
                    day,
                })
            })
            .collect()
    }

    /// Every distinct keyword
    pub fn all_keywords(&self) -> BTreeSet<String> {
        self.keywords().iter().cloned().collect()
    }

    /// Names of all wells (keywords starting with `W`)
    pub fn all_wells(&self) -> BTreeSet<String> {
        self.entities_with_prefix('W')
    }

    /// Names of all groups (keywords starting with `G`)
    pub fn all_groups(&self) -> BTreeSet<String> {
        self.entities_with_prefix('G')
    }

    /// `REGION n` for every region number referenced by an `R` keyword
    pub fn all_regions(&self) -> BTreeSet<String> {
        self.numbers_with_prefix('R', "REGION")
    }

    /// `AQUIFER n` for every aquifer number referenced by an `A` keyword
    pub fn all_aquifers(&self) -> BTreeSet<String> {
        self.numbers_with_prefix('A', "AQUIFER")
    }

    fn entities_with_prefix(&self, prefix: char) -> BTreeSet<String> {
        self.keywords()
            .iter()
            .zip(self.entity_names())
            .filter(|(keyword, name)| keyword.starts_with(prefix) && name.as_str() != NO_ENTITY)
            .map(|(_, name)| name.clone())
            .collect()
    }

    fn numbers_with_prefix(&self, prefix: char, label: &str) -> BTreeSet<String> {
        let Some(nums) = self.table.column("NUMS").map(Column::data) else {
            return BTreeSet::new();
        };
        self.keywords()
            .iter()
            .enumerate()
            .filter(|(_, keyword)| keyword.starts_with(prefix))
            .filter_map(|(row, _)| nums.format_value(row))
            .map(|num| format!("{} {}", label, num))
            .collect()
    }

    /// Time series of the vectors matching both a keyword and an entity name
    ///
    /// The result has one row per timestep, indexed by [`Dataset::all_dates`],
    /// and one column per matched vector labelled `"<entity>: <keyword>(<unit>)"`.
    pub fn select<K, N>(&self, keywords: &[K], entity_names: &[N]) -> Result<Table>
    where
        K: AsRef<str>,
        N: AsRef<str>,
    {
        let dates = self.all_dates()?;

        let keywords: HashSet<&str> = keywords.iter().map(AsRef::as_ref).collect();
        let entity_names: HashSet<&str> = entity_names.iter().map(AsRef::as_ref).collect();
        let mask: Vec<bool> = self
            .keywords()
            .iter()
            .zip(self.entity_names())
            .map(|(k, n)| keywords.contains(k.as_str()) && entity_names.contains(n.as_str()))
            .collect();

        let matched = Dataset::from_table(self.table.filter_rows(&mask));
        log::debug!("Selection matched {} vector(s)", matched.num_vectors());

        let units = matched.text_column("UNITS");
        let columns = matched
            .keywords()
            .iter()
            .zip(matched.entity_names())
            .enumerate()
            .map(|(row, (keyword, name))| {
                let unit = units.get(row).map(String::as_str).unwrap_or("");
                Column::new(
                    format!("{}: {}({})", name, keyword, unit),
                    ColumnData::Float(matched.series(row)),
                )
            })
            .collect();

        Table::new(columns)?.with_index(dates)
    }

    /// Values of one vector across all timesteps, if it exists
    pub fn vector(&self, keyword: &str, entity_name: &str) -> Option<Vec<f64>> {
        let row = self
            .keywords()
            .iter()
            .zip(self.entity_names())
            .position(|(k, n)| k == keyword && n == entity_name)?;
        Some(self.series(row))
    }

    fn series(&self, row: usize) -> Vec<f64> {
        self.table
            .value_columns()
            .map(|c| c.data().get_f64(row).unwrap_or(f64::NAN))
            .collect()
    }
}

fn to_date(year: f64, month: f64, day: f64) -> Option<NaiveDate> {
    let integral = |v: f64| v.is_finite() && v.fract() == 0.0;
    if !(integral(year) && integral(month) && integral(day)) {
        return None;
    }
    if year < i32::MIN as f64 || year > i32::MAX as f64 || month < 1.0 || day < 1.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
}
