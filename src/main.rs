//! geo2sql CLI
//!
//! Resolves, for every geo file under a folder, the database it targets and
//! the settings a loader should apply.

use anyhow::{Result, bail};
use clap::Parser;
use geo2sql::batch::{BatchOptions, run_batch};
use geo2sql::cli::plan::PlanArgs;
use geo2sql::cli::show::run_show;
use geo2sql::cli::{Cli, Command, FolderArgs};
use geo2sql::config::{ConfigLoader, ConfigPaths, ScanOptions};
use geo2sql::discover::discover_items;
use geo2sql::format::format_report;
use geo2sql::resolve::{ConfigStore, ItemResolver, require_configured};
use geo2sql::sink::DryRunSink;
use geo2sql::validate::{BindingSchema, validate_tree};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn ensure_folder(folder: &Path) -> Result<()> {
    if !folder.is_dir() {
        bail!("No input folder: {}", folder.display());
    }
    Ok(())
}

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", text)?;
        }
    }
    Ok(())
}

/// Returns whether every item resolved (or was skipped) without error.
fn run_plan(args: &PlanArgs, scan: &ScanOptions) -> Result<bool> {
    ensure_folder(&args.folder)?;

    validate_tree(&args.folder, scan, &BindingSchema)?;
    let store = ConfigStore::build(&args.folder, scan)?;
    let items = discover_items(&args.folder, scan)?;
    info!(
        "Resolving {} items against {} configured directories",
        items.len(),
        store.len()
    );

    let resolver = ItemResolver::from_options(&store, scan);
    let options = BatchOptions {
        jobs: args.jobs.unwrap_or(scan.jobs),
        fail_fast: args.fail_fast,
    };
    let report = run_batch(&resolver, &items, &DryRunSink, options);
    info!(
        "{} resolved, {} skipped, {} failed",
        report.resolved_count(),
        report.skipped_count(),
        report.failed_count()
    );

    write_output(args.output.as_deref(), &format_report(&report, args.format))?;
    Ok(!report.has_failures())
}

fn run_validate(args: &FolderArgs, scan: &ScanOptions) -> Result<()> {
    ensure_folder(&args.folder)?;

    let checked = validate_tree(&args.folder, scan, &BindingSchema)?;
    let store = ConfigStore::build(&args.folder, scan)?;
    require_configured(&store)?;

    println!(
        "{} '{}' files valid, {} configured directories",
        checked,
        scan.bindings_file,
        store.len()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut paths = ConfigPaths::discover();
    if let Some(ref config) = cli.config {
        paths = paths.with_explicit(config);
    }
    let loader = ConfigLoader::load_with_paths(paths)?;
    for (tier, file) in loader.sources() {
        debug!("Using {} config {}", tier, file.display());
    }
    let scan = loader.into_config().scan;

    match cli.command {
        Command::Plan(ref args) => {
            if !run_plan(args, &scan)? {
                std::process::exit(1);
            }
        }
        Command::Validate(ref args) => run_validate(args, &scan)?,
        Command::Show(ref args) => {
            ensure_folder(&args.folder)?;
            write_output(None, &run_show(args, &scan)?)?;
        }
    }

    Ok(())
}
