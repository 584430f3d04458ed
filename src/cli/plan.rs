//! Plan subcommand for geo2sql
//!
//! Resolves every item under a folder and reports, per item, the database it
//! targets and the settings a loader would receive.

use super::parse_format;
use crate::format::OutputFormat;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the plan subcommand
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Input folder
    pub folder: PathBuf,

    /// Output format: json or markdown
    #[arg(short, long, default_value = "json", value_parser = parse_format)]
    pub format: OutputFormat,

    /// Output file path (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Worker threads for item resolution (overrides config)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Stop at the first item that fails to resolve
    #[arg(long)]
    pub fail_fast: bool,
}
