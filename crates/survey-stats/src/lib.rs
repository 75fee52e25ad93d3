//! Statistics for the licensure-intent survey: variable decoding,
//! descriptive statistics, correlation, cross-tabulation and the data
//! dictionary.

pub mod analysis;
pub mod correlation;
pub mod crosstab;
pub mod descriptive;
pub mod dictionary;
pub mod error;
pub mod select;

pub use analysis::{
    FactorResult, GroupStats, LevelCount, OutcomeSummary, SurveyAnalysis, analyze,
};
pub use correlation::{average_ranks, correlate, pearson, spearman};
pub use crosstab::{ChiSquareTest, CrossTab};
pub use dictionary::{DictionaryEntry, FieldType, build_dictionary, classify_field};
pub use error::{AnalysisError, Result};
pub use select::{RowSelection, decode_categorical, decode_scaled, select_rows, validate_schema};
