//! Excel workbook reading.
//!
//! Only the first worksheet is read. Numeric cells are written without
//! trailing zeros so coded answers read the same as in a CSV export.

use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};

use crate::error::{IngestError, Result};
use crate::polars_utils::format_numeric;
use crate::table::{SurveyTable, is_blank, normalize_cell};

pub fn read_xlsx_table(path: &Path) -> Result<SurveyTable> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let xlsx_error = |source| IngestError::Xlsx {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(xlsx_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::EmptyTable {
            path: path.to_path_buf(),
        })?
        .map_err(xlsx_error)?;

    let first_row = range.start().map_or(0, |(row, _)| row as usize);
    let raw_rows: Vec<(usize, Vec<String>)> = range
        .rows()
        .enumerate()
        .map(|(offset, cells)| {
            let row: Vec<String> = cells.iter().map(cell_to_string).collect();
            (first_row + offset + 1, row)
        })
        .filter(|(_, row)| !is_blank(row))
        .collect();
    SurveyTable::from_raw_rows(path, &raw_rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => normalize_cell(text),
        Data::Float(value) => format_numeric(*value),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        other => normalize_cell(&other.to_string()),
    }
}
