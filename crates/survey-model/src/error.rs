use std::path::PathBuf;

use thiserror::Error;

use crate::plan::FieldRole;

/// A required field is missing from the dataset or holds a value that does
/// not fit its declared scale.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataSchemaError {
    #[error("required {role} field '{field}' is missing from the dataset")]
    MissingField { field: String, role: FieldRole },

    #[error(
        "{role} field '{field}' has value '{value}' at {file} row {row} that is not on scale '{scale}'"
    )]
    InvalidValue {
        field: String,
        role: FieldRole,
        scale: String,
        /// File name of the export holding the value.
        file: String,
        /// 1-based row within `file`.
        row: usize,
        value: String,
    },
}

impl DataSchemaError {
    /// The field that caused the failure.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field, .. } | Self::InvalidValue { field, .. } => field,
        }
    }
}

/// Errors raised while loading or validating an analysis plan.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to read plan file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse plan file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("plan outcome field is empty")]
    EmptyOutcome,

    #[error("factor field name is empty")]
    EmptyFactor,

    #[error("unknown scale '{name}'")]
    UnknownScale { name: String },

    #[error("scale '{scale}' has no levels")]
    EmptyScale { scale: String },

    #[error("scale '{scale}' repeats {what} '{value}'")]
    DuplicateLevel {
        scale: String,
        what: &'static str,
        value: String,
    },

    #[error("binary factor '{field}' uses scale '{scale}' with {levels} levels (expected 2)")]
    NotBinary {
        field: String,
        scale: String,
        levels: usize,
    },

    #[error("categorical factor '{field}' lists no levels")]
    NoCategories { field: String },

    #[error("factor '{field}' is listed more than once")]
    DuplicateFactor { field: String },

    #[error("factor '{field}' is also the outcome field")]
    FactorIsOutcome { field: String },

    #[error("factors '{first}' and '{second}' map to the same artifact name '{name}'")]
    ArtifactNameCollision {
        first: String,
        second: String,
        name: String,
    },

    #[error("chart top_n must be at least 1")]
    ZeroTopN,
}

impl PlanError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
