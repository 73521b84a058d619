//! focusmania-predict - predict whether a planned task will be completed
//!
//! Trains on the cleaned log, then reports the forest's prediction, the
//! heuristic risk score with the factors behind it, and a recommendation.

mod common;

use anyhow::{Context, Result};
use clap::Parser;
use common::OutputFormat;
use focusmania_core::format::format_percent;
use focusmania_core::predict::{evaluate, ForestParams};
use focusmania_core::{Mood, Priority, TaskCandidate};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "focusmania-predict")]
#[command(about = "Predict completion and risk for a planned task")]
#[command(version)]
struct Args {
    /// Planned time in minutes
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(10..=180))]
    time: u32,

    /// Priority: low, medium or high
    #[arg(short, long)]
    priority: Priority,

    /// Mood: focused, calm, tired or stressed
    #[arg(short, long)]
    mood: Mood,

    /// Category, as it appears in the task log (e.g. "Work")
    #[arg(short, long)]
    category: String,

    /// Cleaned task log (defaults to the configured path)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (config, _log_guard) = common::init("focusmania-predict")?;

    let path = common::data_path(args.data, &config);
    let history = common::load_records(&path)?;

    let candidate = TaskCandidate::new(
        args.category.trim(),
        args.priority,
        args.mood,
        f64::from(args.time),
    );
    let params = ForestParams::from(&config.model);
    let result = evaluate(&history, &candidate, &params).context("failed to evaluate task")?;

    match args.format {
        OutputFormat::Json => common::print_json(&result)?,
        OutputFormat::Text => {
            let verdict = if result.completed_prediction {
                "likely to be completed"
            } else {
                "at risk of not being completed"
            };
            println!(
                "{} / {} priority / {} / {} min",
                candidate.category, candidate.priority, candidate.mood, args.time
            );
            println!(
                "Prediction:     {} ({} of trees vote completed)",
                verdict,
                format_percent(result.completion_probability)
            );
            println!("Risk score:     {:.2}", result.risk_score);
            if result.risk_factors.is_empty() {
                println!("Risk factors:   none");
            } else {
                let factors: Vec<_> = result.risk_factors.iter().map(|f| f.description()).collect();
                println!("Risk factors:   {}", factors.join(", "));
            }
            println!("Recommendation: {}", result.recommendation);
        }
    }

    Ok(())
}
