//! Survey data ingestion: locating exports, reading CSV and Excel files, and
//! building the survey frame.

pub mod csv_table;
pub mod discovery;
pub mod error;
pub mod frame;
pub mod polars_utils;
pub mod table;
pub mod xlsx_table;

pub use csv_table::read_csv_table;
pub use discovery::{DATASET_EXTENSIONS, DEFAULT_DATA_DIRS, list_dataset_files, resolve_dataset_paths};
pub use error::{IngestError, Result};
pub use frame::{RowOrigin, SurveyFrame};
pub use polars_utils::{any_to_string, format_numeric};
pub use table::{SurveyTable, read_survey_table};
pub use xlsx_table::read_xlsx_table;
