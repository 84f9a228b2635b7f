//! Column-oriented table
//!
//! A [`Table`] is an ordered list of named columns of equal length. Each
//! column holds one of three element kinds (text, integer, float), so the
//! table stays typed without resorting to dynamic values. A table may carry
//! a row index of timestamps, which is how time-indexed views are expressed.

use crate::types::{RecordData, ReaderError, Result, Timestamp};
use serde::Serialize;

/// Vector-identity columns, in table order
pub const HEADER_COLUMNS: [&str; 4] = ["KEYWORDS", "UNITS", "NUMS", "WGNAMES"];

/// Values of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum ColumnData {
    Text(Vec<String>),
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl ColumnData {
    /// Number of rows
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(v) => v.len(),
            ColumnData::Int(v) => v.len(),
            ColumnData::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_text(&self) -> Option<&[String]> {
        match self {
            ColumnData::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&[i64]> {
        match self {
            ColumnData::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&[f64]> {
        match self {
            ColumnData::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Numeric value at `row`, if the column is numeric
    pub fn get_f64(&self, row: usize) -> Option<f64> {
        match self {
            ColumnData::Int(v) => v.get(row).map(|x| *x as f64),
            ColumnData::Float(v) => v.get(row).copied(),
            ColumnData::Text(_) => None,
        }
    }

    /// Text value at `row`, if the column holds text
    pub fn get_text(&self, row: usize) -> Option<&str> {
        self.as_text().and_then(|v| v.get(row)).map(String::as_str)
    }

    /// Value at `row` formatted for display
    pub fn format_value(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Text(v) => v.get(row).cloned(),
            ColumnData::Int(v) => v.get(row).map(|x| x.to_string()),
            ColumnData::Float(v) => v.get(row).map(|x| x.to_string()),
        }
    }

    /// Keep only the rows where `mask` is true
    pub fn filter(&self, mask: &[bool]) -> ColumnData {
        fn keep<T: Clone>(values: &[T], mask: &[bool]) -> Vec<T> {
            values
                .iter()
                .zip(mask)
                .filter(|(_, keep)| **keep)
                .map(|(v, _)| v.clone())
                .collect()
        }
        match self {
            ColumnData::Text(v) => ColumnData::Text(keep(v, mask)),
            ColumnData::Int(v) => ColumnData::Int(keep(v, mask)),
            ColumnData::Float(v) => ColumnData::Float(keep(v, mask)),
        }
    }
}

impl From<RecordData> for ColumnData {
    fn from(data: RecordData) -> Self {
        match data {
            RecordData::Text(v) => ColumnData::Text(v),
            RecordData::Int(v) => ColumnData::Int(v.into_iter().map(i64::from).collect()),
            RecordData::Real(v) => ColumnData::Float(v.into_iter().map(f64::from).collect()),
            RecordData::Double(v) => ColumnData::Float(v),
            RecordData::Logical(v) => ColumnData::Int(v.into_iter().map(i64::from).collect()),
            RecordData::Empty => ColumnData::Text(Vec::new()),
        }
    }
}

/// A named column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Ordered set of equal-length named columns with an optional row index
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<Vec<Timestamp>>,
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, checking every column has the same length
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut table = Table::default();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Attach a row index; its length must match the row count
    pub fn with_index(mut self, index: Vec<Timestamp>) -> Result<Self> {
        if let Some(first) = self.columns.first() {
            if first.len() != index.len() {
                return Err(ReaderError::ColumnLengthMismatch {
                    column: first.name.clone(),
                    expected: index.len(),
                    found: first.len(),
                });
            }
        }
        self.index = Some(index);
        Ok(self)
    }

    /// Append a column at the end
    pub(crate) fn push_column(&mut self, column: Column) -> Result<()> {
        let expected = match (&self.index, self.columns.first()) {
            (Some(index), _) => Some(index.len()),
            (None, Some(first)) => Some(first.len()),
            (None, None) => None,
        };
        if let Some(expected) = expected {
            let found = column.len();
            if found != expected {
                return Err(ReaderError::ColumnLengthMismatch {
                    column: column.name,
                    expected,
                    found,
                });
            }
        }
        self.columns.push(column);
        Ok(())
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Columns that are not vector-identity columns
    pub fn value_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| !HEADER_COLUMNS.contains(&c.name.as_str()))
    }

    pub fn index(&self) -> Option<&[Timestamp]> {
        self.index.as_deref()
    }

    pub fn num_rows(&self) -> usize {
        match &self.index {
            Some(index) => index.len(),
            None => self.columns.first().map(Column::len).unwrap_or(0),
        }
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// New table containing only the rows where `mask` is true
    pub fn filter_rows(&self, mask: &[bool]) -> Table {
        let index = self.index.as_ref().map(|index| {
            index
                .iter()
                .zip(mask)
                .filter(|(_, keep)| **keep)
                .map(|(ts, _)| *ts)
                .collect()
        });
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.data.filter(mask)))
            .collect();
        Table { index, columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Table {
        Table::new(vec![
            Column::new(
                "KEYWORDS",
                ColumnData::Text(vec!["WOPR".into(), "FOPR".into(), "WWCT".into()]),
            ),
            Column::new("NUMS", ColumnData::Int(vec![0, 0, 0])),
            Column::new("PARAMS1", ColumnData::Float(vec![1.0, 2.0, 3.0])),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_and_shape() {
        let table = sample();
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.num_columns(), 3);
        assert_eq!(table.column("NUMS").unwrap().data().as_int(), Some(&[0, 0, 0][..]));
        assert!(table.column("MISSING").is_none());
        let values: Vec<&str> = table.value_columns().map(Column::name).collect();
        assert_eq!(values, vec!["PARAMS1"]);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = Table::new(vec![
            Column::new("A", ColumnData::Int(vec![1, 2])),
            Column::new("B", ColumnData::Int(vec![1])),
        ]);
        assert!(matches!(
            result,
            Err(ReaderError::ColumnLengthMismatch { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn test_filter_rows() {
        let filtered = sample().filter_rows(&[true, false, true]);
        assert_eq!(filtered.num_rows(), 2);
        assert_eq!(
            filtered.column("KEYWORDS").unwrap().data().get_text(1),
            Some("WWCT")
        );
        assert_eq!(
            filtered.column("PARAMS1").unwrap().data().as_float(),
            Some(&[1.0, 3.0][..])
        );
    }

    #[test]
    fn test_index_without_columns() {
        let day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let table = Table::default().with_index(vec![day, day]).unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_columns(), 0);
    }

    #[test]
    fn test_index_length_checked() {
        let day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert!(sample().with_index(vec![day]).is_err());
    }

    #[test]
    fn test_record_data_conversion() {
        let column = ColumnData::from(RecordData::Real(vec![0.5, 2.0]));
        assert_eq!(column, ColumnData::Float(vec![0.5, 2.0]));
        let column = ColumnData::from(RecordData::Logical(vec![true, false]));
        assert_eq!(column, ColumnData::Int(vec![1, 0]));
    }
}
