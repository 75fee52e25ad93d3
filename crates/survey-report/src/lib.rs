//! Survey analysis outputs.
//!
//! - **Tables**: factor summary, outcome distribution, data dictionary and
//!   per-factor cross-tabulations and group means, as CSV
//! - **Charts**: PNG bar charts of correlation strength and group means
//! - **Report**: a Markdown rendering of the analysis
//! - **Manifest**: every artifact with its SHA-256 digest

pub mod charts;
pub mod common;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod markdown;
pub mod tables;
pub mod writer;

pub use error::{ReportError, Result};
pub use markdown::{ReportContext, render_report};
pub use writer::{OutputSummary, RunInfo, write_outputs};
