//! focusmania-compare - held-out comparison of the completion models
//!
//! Splits the cleaned log, trains logistic regression and the random forest
//! on the same training rows and scores both on the held-out rows.

mod common;

use anyhow::{Context, Result};
use clap::Parser;
use common::OutputFormat;
use focusmania_core::format::format_percent;
use focusmania_core::predict::compare_models;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "focusmania-compare")]
#[command(about = "Compare logistic regression and random forest accuracy")]
#[command(version)]
struct Args {
    /// Cleaned task log (defaults to the configured path)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Fraction of rows held out for testing (overrides config)
    #[arg(long)]
    test_size: Option<f64>,

    /// Split and forest seed (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (config, _log_guard) = common::init("focusmania-compare")?;

    let path = common::data_path(args.data, &config);
    let records = common::load_records(&path)?;

    let mut model_config = config.model.clone();
    if let Some(test_size) = args.test_size {
        model_config.test_size = test_size;
    }
    if let Some(seed) = args.seed {
        model_config.seed = seed;
    }

    let comparison =
        compare_models(&records, &model_config).context("failed to compare models")?;

    if args.format == OutputFormat::Json {
        return common::print_json(&comparison);
    }

    println!(
        "Trained on {} rows, tested on {} rows\n",
        comparison.train_rows, comparison.test_rows
    );
    for score in &comparison.scores {
        println!("{:<20} accuracy {}", score.model, format_percent(score.accuracy));
    }

    for score in &comparison.scores {
        println!("\n{} classification report:", score.model);
        print!("{}", score.report.render());
    }

    if let Some(best) = comparison.best() {
        println!("\nBest model: {}", best.model);
    }

    Ok(())
}
