use thiserror::Error;

use survey_ingest::IngestError;
use survey_model::DataSchemaError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Schema(#[from] DataSchemaError),

    #[error("failed to read survey data: {0}")]
    Ingest(#[from] IngestError),
}

impl AnalysisError {
    /// The schema failure behind this error, if any.
    pub fn as_schema(&self) -> Option<&DataSchemaError> {
        match self {
            Self::Schema(err) => Some(err),
            Self::Ingest(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
