//! Error types for survey data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while locating and loading survey exports.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Dataset path does not exist.
    #[error("dataset not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No dataset files in any searched location.
    #[error("no .csv or .xlsx dataset found in {searched}")]
    NoDataFiles { searched: String },

    /// Failed to read a dataset file.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Failed to parse CSV.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to open or read an Excel workbook.
    #[error("failed to read workbook {path}: {source}")]
    Xlsx {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    /// Export has no header row.
    #[error("dataset file is empty: {path}")]
    EmptyTable { path: PathBuf },

    /// A header cell is blank.
    #[error("column {index} has an empty name in {path}")]
    EmptyColumnName { path: PathBuf, index: usize },

    /// The same column name appears twice in one file.
    #[error("column '{column}' appears more than once in {path}")]
    DuplicateColumn { path: PathBuf, column: String },

    // === DataFrame Errors ===
    /// Column not found in the survey frame.
    #[error("column '{column}' not found in survey frame")]
    ColumnNotFound { column: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
