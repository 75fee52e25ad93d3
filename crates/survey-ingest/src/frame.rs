//! The in-memory survey table.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};
use tracing::{debug, info};

use crate::error::{IngestError, Result};
use crate::polars_utils::any_to_string;
use crate::table::{SurveyTable, read_survey_table};

/// Where a frame row came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOrigin {
    /// File name of the export.
    pub source: String,
    /// 1-based row (CSV line or sheet row) within that export.
    pub row: usize,
}

/// Loaded survey responses: one row per respondent, one string column per
/// question code. Read-only once built.
#[derive(Debug, Clone)]
pub struct SurveyFrame {
    data: DataFrame,
    questions: BTreeMap<String, String>,
    sources: Vec<PathBuf>,
    /// Per frame row: index into `sources` and row number in that file.
    origins: Vec<(usize, usize)>,
}

impl SurveyFrame {
    /// Read and concatenate the given exports.
    pub fn load(paths: &[PathBuf]) -> Result<Self> {
        let mut tables = Vec::with_capacity(paths.len());
        for path in paths {
            let table = read_survey_table(path)?;
            debug!(
                path = %path.display(),
                rows = table.rows.len(),
                columns = table.headers.len(),
                "read survey export"
            );
            tables.push((path.clone(), table));
        }
        let frame = Self::from_tables(tables)?;
        info!(
            files = frame.sources.len(),
            rows = frame.height(),
            columns = frame.data.width(),
            "survey loaded"
        );
        Ok(frame)
    }

    /// Build a frame from already-parsed tables.
    ///
    /// The column set is the union of all headers in first-seen order; cells
    /// a table does not have are empty.
    pub fn from_tables(tables: Vec<(PathBuf, SurveyTable)>) -> Result<Self> {
        let mut columns: Vec<String> = Vec::new();
        let mut questions: BTreeMap<String, String> = BTreeMap::new();
        for (_, table) in &tables {
            for (idx, header) in table.headers.iter().enumerate() {
                if !columns.contains(header) {
                    columns.push(header.clone());
                }
                let question = table
                    .questions
                    .as_ref()
                    .and_then(|q| q.get(idx))
                    .map(|q| q.trim())
                    .filter(|q| !q.is_empty());
                if let Some(question) = question {
                    questions
                        .entry(header.clone())
                        .or_insert_with(|| question.to_string());
                }
            }
        }

        let mut values: Vec<Vec<String>> = vec![Vec::new(); columns.len()];
        let mut origins = Vec::new();
        for (source_idx, (_, table)) in tables.iter().enumerate() {
            let positions: Vec<Option<usize>> = columns
                .iter()
                .map(|column| table.headers.iter().position(|h| h == column))
                .collect();
            for (row_idx, row) in table.rows.iter().enumerate() {
                let row_number = table.row_numbers.get(row_idx).copied().unwrap_or(row_idx + 2);
                origins.push((source_idx, row_number));
                for (column_idx, position) in positions.iter().enumerate() {
                    let cell = position
                        .and_then(|idx| row.get(idx))
                        .cloned()
                        .unwrap_or_default();
                    values[column_idx].push(cell);
                }
            }
        }

        let series: Vec<Column> = columns
            .iter()
            .zip(values)
            .map(|(name, column)| Series::new(name.as_str().into(), column).into_column())
            .collect();
        let data = DataFrame::new(series)?;

        Ok(Self {
            data,
            questions,
            sources: tables.into_iter().map(|(path, _)| path).collect(),
            origins,
        })
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Source file and file row of the frame row at `idx`.
    pub fn row_origin(&self, idx: usize) -> Option<RowOrigin> {
        let (source_idx, row) = *self.origins.get(idx)?;
        let path = self.sources.get(source_idx)?;
        let source = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
        Some(RowOrigin { source, row })
    }

    /// Column names in dataset order.
    pub fn field_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.data.column(field).is_ok()
    }

    pub fn question_text(&self, field: &str) -> Option<&str> {
        self.questions.get(field).map(String::as_str)
    }

    /// All cells of a column as trimmed strings; empty for missing answers.
    pub fn values(&self, field: &str) -> Result<Vec<String>> {
        let column = self
            .data
            .column(field)
            .map_err(|_| IngestError::ColumnNotFound {
                column: field.to_string(),
            })?;
        let values: PolarsResult<Vec<String>> = (0..self.data.height())
            .map(|idx| column.get(idx).map(|value| any_to_string(value).trim().to_string()))
            .collect();
        Ok(values?)
    }

    /// Source file names for reporting, relative to `base` when possible.
    pub fn source_names(&self, base: &Path) -> Vec<String> {
        self.sources
            .iter()
            .map(|path| {
                path.strip_prefix(base)
                    .unwrap_or(path)
                    .display()
                    .to_string()
            })
            .collect()
    }
}
