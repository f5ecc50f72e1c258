//! Case-insensitive substring search over report tables

use rma_common::Table;

/// Indices of rows where any cell contains `term`, ignoring case
///
/// A blank term matches nothing.
pub fn search_table(table: &Table, term: &str) -> Vec<usize> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, cells)| cells.iter().any(|v| v.to_lowercase().contains(&needle)))
        .map(|(i, _)| i)
        .collect()
}

/// Rows matching `term` (all rows when `None`), at most `limit` of them
pub fn filter_table(table: &Table, term: Option<&str>, limit: Option<usize>) -> Table {
    let mut indices: Vec<usize> = match term {
        Some(term) => search_table(table, term),
        None => (0..table.len()).collect(),
    };
    if let Some(limit) = limit {
        indices.truncate(limit);
    }
    table.select(&indices)
}
