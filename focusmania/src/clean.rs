//! focusmania-clean - normalise raw task logs into the cleaned format
//!
//! Drops duplicate rows, normalises text, maps Yes/No completion flags and
//! forward-fills gaps, then writes the cleaned CSV the other tools read.

mod common;

use anyhow::{Context, Result};
use clap::Parser;
use common::OutputFormat;
use focusmania_core::ingest::{self, CleanReport};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "focusmania-clean")]
#[command(about = "Clean raw task logs")]
#[command(version)]
struct Args {
    /// Raw CSV file(s) to clean, concatenated in order
    /// Defaults to the configured raw log
    #[arg(short, long)]
    input: Vec<PathBuf>,

    /// Glob of raw logs inside the data directory (e.g. "productivity_data*.csv")
    #[arg(short, long, conflicts_with = "input")]
    pattern: Option<String>,

    /// Where to write the cleaned CSV (defaults to the configured path)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Report what would change without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Serialize)]
struct CleanOutput {
    inputs: Vec<PathBuf>,
    output: PathBuf,
    written: bool,
    report: CleanReport,
    warnings: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (config, _log_guard) = common::init("focusmania-clean")?;

    let inputs = if let Some(pattern) = &args.pattern {
        let dir = config.data.data_dir();
        let found = ingest::discover_raw_files(&dir, pattern)
            .with_context(|| format!("failed to search {}", dir.display()))?;
        if found.is_empty() {
            anyhow::bail!("No raw logs matching '{}' in {}", pattern, dir.display());
        }
        found
    } else if args.input.is_empty() {
        vec![config.data.raw_path()]
    } else {
        args.input.clone()
    };

    let cleaned = ingest::clean_raw_files(&inputs).context("failed to clean raw task logs")?;
    let output = common::data_path(args.data.clone(), &config);

    if !args.dry_run {
        ingest::write_cleaned_file(&output, &cleaned.records)
            .with_context(|| format!("failed to write {}", output.display()))?;
    }

    match args.format {
        OutputFormat::Json => common::print_json(&CleanOutput {
            inputs,
            output,
            written: !args.dry_run,
            report: cleaned.report,
            warnings: cleaned.warnings,
        })?,
        OutputFormat::Text => {
            for warning in &cleaned.warnings {
                eprintln!("warning: {}", warning);
            }

            let report = &cleaned.report;
            for input in &inputs {
                println!("Input:  {}", input.display());
            }
            println!("Rows read:          {}", report.rows_read);
            println!("Duplicates removed: {}", report.duplicates_removed);
            println!("Values coerced:     {}", report.values_coerced);
            println!("Values filled:      {}", report.values_filled);
            println!("Rows dropped:       {}", report.rows_dropped);
            println!("Rows written:       {}", report.rows_written);

            if args.dry_run {
                println!("\nDry run: {} not written", output.display());
            } else {
                println!("\nCleaned data saved to {}", output.display());
            }
        }
    }

    Ok(())
}
