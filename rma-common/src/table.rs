//! In-memory string table
//!
//! Carrier exports arrive with whatever columns the report template had that
//! week, so the raw side of the pipeline works on an ordered list of column
//! names plus rows of string cells. Blank cells are empty strings.
//!
//! Tables are values: every transforming method consumes `self` and returns
//! the new table, so no stage can mutate a table another stage still holds.

use crate::{Error, Result};

/// Ordered column names plus rows of string cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Borrowed view of a single table row
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    values: &'a [String],
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Create a table from column names and rows
    ///
    /// Short rows are padded with empty cells. A row with more cells than
    /// there are columns is rejected.
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<String>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Create a table whose row width is fixed by the column array
    pub fn from_fixed_rows<const N: usize, I, S>(columns: [&str; N], rows: I) -> Self
    where
        I: IntoIterator<Item = [S; N]>,
        S: Into<String>,
    {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Append a row, padding it to the column count
    pub fn push_row(&mut self, mut row: Vec<String>) -> Result<()> {
        if row.len() > self.columns.len() {
            return Err(Error::InvalidInput(format!(
                "row {} has {} cells but table has {} columns",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            )));
        }
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with this exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell value by row index and column name
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Iterate rows as records
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |values| Record {
            columns: &self.columns,
            values,
        })
    }

    /// Rename every column through `rename`; rows are untouched
    pub fn map_columns<F>(mut self, mut rename: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        self.columns = self.columns.iter().map(|c| rename(c)).collect();
        self
    }

    /// Append `name` filled with `value` for every row, unless it already exists
    pub fn ensure_column(mut self, name: &str, value: &str) -> Self {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
            for row in &mut self.rows {
                row.push(value.to_string());
            }
        }
        self
    }

    /// Keep only the rows at `indices`, in that order; out-of-range indices are skipped
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// Keep exactly `columns`, in that order; absent columns come back empty
    pub fn project(&self, columns: &[&str]) -> Self {
        let indices: Vec<Option<usize>> = columns.iter().map(|c| self.column_index(c)).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|idx| idx.map(|i| row[i].clone()).unwrap_or_default())
                    .collect()
            })
            .collect();
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }
}

impl<'a> Record<'a> {
    /// Value of the first column with this name
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i].as_str())
    }

    /// Value of `column`, or "" when the column is absent
    pub fn get_or_empty(&self, column: &str) -> &'a str {
        self.get(column).unwrap_or("")
    }

    /// Cell values in column order
    pub fn values(&self) -> impl Iterator<Item = &'a str> + 'a {
        let values = self.values;
        values.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            ["A", "B"],
            vec![
                vec!["1".to_string(), "x".to_string()],
                vec!["2".to_string()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = sample();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, "B"), Some(""));
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let mut table = Table::new(["A"]);
        let err = table
            .push_row(vec!["1".to_string(), "2".to_string()])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_ensure_column_adds_once() {
        let table = sample().ensure_column("C", "").ensure_column("C", "ignored");
        assert_eq!(table.columns(), ["A", "B", "C"]);
        assert_eq!(table.cell(0, "C"), Some(""));
    }

    #[test]
    fn test_fixed_rows_match_column_count() {
        let table = Table::from_fixed_rows(["A", "B"], [["1", "x"], ["2", "y"]]);
        assert_eq!(table.columns(), ["A", "B"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, "B"), Some("y"));
    }

    #[test]
    fn test_select_keeps_requested_rows() {
        let table = Table::from_fixed_rows(["A"], [["1"], ["2"], ["3"]]);
        let picked = table.select(&[2, 0, 7]);
        assert_eq!(picked.columns(), ["A"]);
        assert_eq!(picked.rows(), [vec!["3".to_string()], vec!["1".to_string()]]);
    }

    #[test]
    fn test_project_orders_and_fills() {
        let projected = sample().project(&["B", "Z", "A"]);
        assert_eq!(projected.columns(), ["B", "Z", "A"]);
        assert_eq!(projected.rows()[0], vec!["x", "", "1"]);
    }

    #[test]
    fn test_record_lookup_uses_first_duplicate() {
        let table = Table::from_rows(
            ["Status", "Status"],
            vec![vec!["first".to_string(), "second".to_string()]],
        )
        .unwrap();
        let record = table.records().next().unwrap();
        assert_eq!(record.get("Status"), Some("first"));
        assert_eq!(record.get_or_empty("Missing"), "");
        assert_eq!(record.values().collect::<Vec<_>>(), vec!["first", "second"]);
    }

    #[test]
    fn test_map_columns_keeps_rows() {
        let table = sample().map_columns(|c| c.to_lowercase());
        assert_eq!(table.columns(), ["a", "b"]);
        assert_eq!(table.cell(0, "a"), Some("1"));
    }
}
