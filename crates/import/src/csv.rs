use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::raw::{RawRow, RawTable, RawValue};

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] ::csv::Error),
    #[error("Input file not found: {0}")]
    NotFound(String),
    #[error("Unsupported file type '{0}'. Use .csv")]
    UnsupportedFileType(String),
    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(String),
}

fn delimiter_byte(delimiter: &str) -> Result<u8, ReadError> {
    match delimiter.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(ReadError::InvalidDelimiter(delimiter.to_string())),
    }
}

/// Reads delimited text with a header row. Empty cells are null, every other
/// cell is text; short rows are padded with nulls and extra cells ignored.
pub fn read_csv<R: Read>(data: R, delimiter: &str) -> Result<RawTable, ReadError> {
    let delimiter = delimiter_byte(delimiter)?;
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut table = RawTable::new(headers.clone());

    for result in reader.records() {
        let record = result?;
        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = match record.get(i) {
                    Some(cell) if !cell.is_empty() => RawValue::Text(cell.to_string()),
                    _ => RawValue::Null,
                };
                (header.clone(), value)
            })
            .collect();
        table.push_row(row);
    }

    Ok(table)
}

/// Reads a transactions file, choosing the parser from its extension.
pub fn read_input(path: &Path, delimiter: &str) -> Result<RawTable, ReadError> {
    if !path.exists() {
        return Err(ReadError::NotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    match ext.as_str() {
        "csv" => {
            let table = read_csv(File::open(path)?, delimiter)?;
            info!(path = %path.display(), rows = table.len(), "read input file");
            Ok(table)
        }
        _ => Err(ReadError::UnsupportedFileType(ext)),
    }
}
