//! The raw table shared by every export format.
//!
//! Survey platforms export one header row of question codes, optionally
//! followed by a row of question text and a row of `{"ImportId": ...}`
//! metadata before the responses start. Spreadsheet exports may carry one
//! more row above the codes. The extra rows are recognised and removed; the
//! question text is kept.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::csv_table::read_csv_table;
use crate::error::{IngestError, Result};
use crate::xlsx_table::read_xlsx_table;

/// Rows scanned for the `ImportId` metadata row.
const HEADER_SCAN_ROWS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyTable {
    pub headers: Vec<String>,
    /// Question text per column when the export carries it.
    pub questions: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
    /// 1-based CSV line or sheet row each entry of `rows` starts on.
    pub row_numbers: Vec<usize>,
}

impl SurveyTable {
    /// A plain table: headers on row 1, data from row 2 without gaps.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let row_numbers = (2..rows.len() + 2).collect();
        Self {
            headers,
            questions: None,
            rows,
            row_numbers,
        }
    }

    /// Build a table from non-empty raw rows tagged with their 1-based
    /// position in the file.
    pub(crate) fn from_raw_rows(path: &Path, raw_rows: &[(usize, Vec<String>)]) -> Result<Self> {
        if raw_rows.is_empty() {
            return Err(IngestError::EmptyTable {
                path: path.to_path_buf(),
            });
        }

        let import_row = raw_rows
            .iter()
            .take(HEADER_SCAN_ROWS)
            .position(|(_, row)| is_import_id_row(row))
            .filter(|idx| *idx >= 2);
        let (header_idx, question_idx, data_start) = match import_row {
            Some(idx) => (idx - 2, Some(idx - 1), idx + 1),
            None => (0, None, 1),
        };

        let headers: Vec<String> = raw_rows[header_idx]
            .1
            .iter()
            .map(|value| normalize_header(value))
            .collect();
        let width = headers.iter().rposition(|h| !h.is_empty()).map_or(0, |idx| idx + 1);
        let headers = headers[..width].to_vec();
        let mut seen = BTreeSet::new();
        for (index, header) in headers.iter().enumerate() {
            if header.is_empty() {
                return Err(IngestError::EmptyColumnName {
                    path: path.to_path_buf(),
                    index: index + 1,
                });
            }
            if !seen.insert(header.as_str()) {
                return Err(IngestError::DuplicateColumn {
                    path: path.to_path_buf(),
                    column: header.clone(),
                });
            }
        }

        let questions = question_idx.map(|idx| pad_row(&raw_rows[idx].1, width));
        debug!(
            path = %path.display(),
            columns = width,
            header_rows = data_start,
            "export header detected"
        );

        let (row_numbers, rows) = raw_rows
            .iter()
            .skip(data_start)
            .map(|(number, record)| (*number, pad_row(record, width)))
            .unzip();
        Ok(Self {
            headers,
            questions,
            rows,
            row_numbers,
        })
    }
}

/// Read one export, choosing the reader by file extension.
///
/// `.xlsx` files are read as workbooks; anything else as CSV.
pub fn read_survey_table(path: &Path) -> Result<SurveyTable> {
    let is_workbook = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
    if is_workbook {
        read_xlsx_table(path)
    } else {
        read_csv_table(path)
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

pub(crate) fn is_blank(row: &[String]) -> bool {
    row.iter().all(String::is_empty)
}

fn is_import_id_row(row: &[String]) -> bool {
    row.iter().any(|cell| {
        let compact: String = cell.chars().filter(|ch| !ch.is_whitespace()).collect();
        compact.starts_with("{\"ImportId\"") || compact.starts_with("{\"importId\"")
    })
}

fn pad_row(record: &[String], width: usize) -> Vec<String> {
    (0..width)
        .map(|idx| record.get(idx).cloned().unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(rows: &[&[&str]]) -> Vec<(usize, Vec<String>)> {
        rows.iter()
            .enumerate()
            .map(|(idx, row)| (idx + 1, row.iter().map(|v| v.to_string()).collect()))
            .collect()
    }

    #[test]
    fn import_id_row_detection() {
        let row = vec![
            "{\"ImportId\":\"startDate\",\"timeZone\":\"America/Denver\"}".to_string(),
            String::new(),
        ];
        assert!(is_import_id_row(&row));
        assert!(!is_import_id_row(&["Very likely".to_string()]));
    }

    #[test]
    fn headers_collapse_whitespace() {
        assert_eq!(normalize_header("\u{feff} Q29 "), "Q29");
        assert_eq!(normalize_header("Start   Date"), "Start Date");
    }

    #[test]
    fn title_row_above_codes_is_skipped() {
        let table = SurveyTable::from_raw_rows(
            Path::new("survey.xlsx"),
            &raw(&[
                &["Licensure survey export"],
                &["Finished", "Q29"],
                &["Finished", "How likely?"],
                &["{\"ImportId\":\"finished\"}", "{\"ImportId\":\"QID29\"}"],
                &["1", "Very likely"],
            ]),
        )
        .unwrap();
        assert_eq!(table.headers, vec!["Finished", "Q29"]);
        assert_eq!(table.questions.unwrap()[1], "How likely?");
        assert_eq!(table.rows, vec![vec!["1", "Very likely"]]);
        assert_eq!(table.row_numbers, vec![5]);
    }

    #[test]
    fn trailing_blank_header_cells_are_dropped() {
        let table =
            SurveyTable::from_raw_rows(Path::new("s.csv"), &raw(&[&["Q29", "", ""], &["5", "", ""]]))
                .unwrap();
        assert_eq!(table.headers, vec!["Q29"]);
        assert_eq!(table.rows, vec![vec!["5"]]);
    }

    #[test]
    fn plain_tables_number_rows_after_header() {
        let table = SurveyTable::new(vec!["Q29".to_string()], vec![vec!["1".to_string()]; 3]);
        assert_eq!(table.row_numbers, vec![2, 3, 4]);
    }

    #[test]
    fn short_rows_are_padded() {
        let padded = pad_row(&["a".to_string()], 3);
        assert_eq!(padded, vec!["a", "", ""]);
    }
}
