//! Carrier report ingestion
//!
//! Reads a delimited export with a header row into a [`Table`]. Exports come
//! out of spreadsheet tools, so a UTF-8 BOM on the first header is stripped,
//! non-UTF-8 bytes are replaced rather than rejected, and short rows are padded.

use rma_common::{Error, Result, Table};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

const BOM: char = '\u{feff}';

/// Read a delimited file into a table
pub fn read_table(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| {
        Error::InvalidInput(format!("Cannot open {}: {}", path.display(), e))
    })?;
    let table = read_table_from_reader(BufReader::new(file))?;
    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "Loaded report"
    );
    Ok(table)
}

/// Read delimited text with a header row into a table
pub fn read_table_from_reader<R: Read>(reader: R) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .byte_headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let header = String::from_utf8_lossy(h).into_owned();
            if i == 0 {
                header.trim_start_matches(BOM).to_string()
            } else {
                header
            }
        })
        .collect();

    let width = headers.len();
    let mut table = Table::new(headers);

    for (line, record) in csv_reader.byte_records().enumerate() {
        let record = record?;
        let mut cells: Vec<String> = record
            .iter()
            .map(|cell| String::from_utf8_lossy(cell).into_owned())
            .collect();

        // Trailing delimiters past the header are harmless; real extra data is not
        while cells.len() > width && cells.last().is_some_and(|c| c.trim().is_empty()) {
            cells.pop();
        }
        if cells.len() > width {
            return Err(Error::InvalidInput(format!(
                "data row {} has {} cells but the header has {}",
                line + 1,
                cells.len(),
                width
            )));
        }
        table.push_row(cells)?;
    }

    debug!(rows = table.len(), "Parsed delimited input");
    Ok(table)
}

/// SHA-256 of a file's contents, lower-case hex
pub fn fingerprint(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
