//! CSV export reading.

use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};
use crate::table::{SurveyTable, is_blank, normalize_cell};

/// Maps record byte offsets to 1-based line numbers, moving forward only.
struct LineCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            line: 1,
        }
    }

    /// Line of the first content byte at or after `start`.
    fn line_at(&mut self, start: usize) -> usize {
        let mut start = start.clamp(self.offset, self.bytes.len());
        while start < self.bytes.len() && matches!(self.bytes[start], b'\r' | b'\n') {
            start += 1;
        }
        self.line += self.bytes[self.offset..start]
            .iter()
            .filter(|byte| **byte == b'\n')
            .count();
        self.offset = start;
        self.line
    }
}

pub fn read_csv_table(path: &Path) -> Result<SurveyTable> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes.as_slice());
    let mut lines = LineCursor::new(&bytes);
    let mut raw_rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        let start = record.position().map_or(0, |pos| pos.byte() as usize);
        let line = lines.line_at(start);
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if is_blank(&row) {
            continue;
        }
        raw_rows.push((line, row));
    }
    SurveyTable::from_raw_rows(path, &raw_rows)
}
