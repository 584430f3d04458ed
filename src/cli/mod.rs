//! CLI command definitions for geo2sql
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod plan;
pub mod show;

use crate::format::OutputFormat;
use clap::{Args, Parser, Subcommand};
use plan::PlanArgs;
use show::ShowArgs;
use std::path::PathBuf;

/// Resolve load configuration for trees of geo files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (replaces project and user config)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve every item under a folder and print the load plan
    Plan(PlanArgs),

    /// Validate binding files and directory configuration without resolving items
    Validate(FolderArgs),

    /// Show the resolved configuration for one directory or item
    Show(ShowArgs),
}

/// A scan root.
#[derive(Args, Debug)]
pub struct FolderArgs {
    /// Input folder
    pub folder: PathBuf,
}

/// Parse an `--format` value.
pub fn parse_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_str(s).ok_or_else(|| format!("unknown format '{}' (json, markdown)", s))
}
