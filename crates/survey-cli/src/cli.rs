//! CLI argument definitions for the survey analysis runner.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use survey_model::CorrelationMethod;

#[derive(Parser)]
#[command(
    name = "survey-analysis",
    version,
    about = "Licensure-intent survey analysis - factors behind CPA licensure plans",
    long_about = "Analyse the licensure-intent survey and write tables, charts,\n\
                  a Markdown report and a manifest to the output directory.\n\n\
                  Running without a subcommand is the same as `run` with defaults."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyse the dataset and write all artifacts.
    Run(RunArgs),

    /// Print the effective analysis plan.
    Plan(PlanArgs),
}

#[derive(Args, Default)]
pub struct RunArgs {
    /// Dataset CSV or .xlsx file, or a directory of them (default: files in ./data and .).
    #[arg(long = "data", value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Output directory for generated files (default: output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// JSON analysis plan replacing the built-in one.
    #[arg(long = "plan", value_name = "FILE")]
    pub plan: Option<PathBuf>,

    /// Correlation method (overrides the plan).
    #[arg(long = "method", value_enum)]
    pub method: Option<MethodArg>,

    /// Number of factors shown in the correlation chart (overrides the plan).
    #[arg(long = "top", value_name = "N")]
    pub top: Option<usize>,

    /// Analyse every response, not only completed ones.
    #[arg(long = "include-incomplete")]
    pub include_incomplete: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    /// JSON analysis plan replacing the built-in one.
    #[arg(long = "plan", value_name = "FILE")]
    pub plan: Option<PathBuf>,

    /// Print the plan as JSON, usable as a plan-file template.
    #[arg(long = "json")]
    pub json: bool,
}

/// CLI correlation method choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum MethodArg {
    Pearson,
    Spearman,
}

impl From<MethodArg> for CorrelationMethod {
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::Pearson => CorrelationMethod::Pearson,
            MethodArg::Spearman => CorrelationMethod::Spearman,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
