//! focusmania-analyze - overview metrics and completion breakdowns
//!
//! Loads the cleaned task log and prints headline numbers followed by
//! completion rates per category, priority, mood and day.

mod common;

use anyhow::{Context, Result};
use clap::Parser;
use common::OutputFormat;
use focusmania_core::analytics::{AnalyticsReport, CompletionRate, DEFAULT_BIN_WIDTH};
use focusmania_core::format::{format_bar, format_percent};
use std::path::PathBuf;

const BAR_WIDTH: usize = 20;

#[derive(Parser)]
#[command(name = "focusmania-analyze")]
#[command(about = "Summarise completion patterns in the task log")]
#[command(version)]
struct Args {
    /// Cleaned task log (defaults to the configured path)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Width of time-spent histogram bins, in minutes
    #[arg(long, default_value_t = DEFAULT_BIN_WIDTH)]
    bin_width: f64,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (config, _log_guard) = common::init("focusmania-analyze")?;

    let path = common::data_path(args.data, &config);
    let records = common::load_records(&path)?;

    let report =
        AnalyticsReport::build(&records, args.bin_width).context("failed to compute analytics")?;

    if args.format == OutputFormat::Json {
        return common::print_json(&report);
    }

    if records.is_empty() {
        println!("No tasks found in {}.", path.display());
        println!("Run 'focusmania-clean' first to produce a cleaned log.");
        return Ok(());
    }

    let overview = &report.overview;
    println!("Overview");
    println!("  Total tasks:          {}", overview.total_tasks);
    println!("  Completion rate:      {}", overview.format_completion_rate());
    println!("  Avg time spent:       {}", overview.format_avg_time());
    println!("  High priority tasks:  {}", overview.high_priority_tasks);

    print_rates("Completion by category", &report.by_category);
    print_rates("Completion by priority", &report.by_priority);

    println!("\nMood vs completion");
    println!("  {:<10} {:>9} {:>13}", "Mood", "completed", "not completed");
    for row in &report.by_mood {
        println!(
            "  {:<10} {:>9} {:>13}",
            row.mood.as_str(),
            row.completed,
            row.not_completed
        );
    }

    if !report.daily_trend.is_empty() {
        println!("\nDaily completion rate");
        for day in &report.daily_trend {
            println!(
                "  {}  {}  {:>6} ({}/{})",
                day.date,
                format_bar(day.rate, BAR_WIDTH),
                format_percent(day.rate),
                day.completed,
                day.total
            );
        }
    }

    println!("\nTime spent (minutes)");
    let widest = report
        .time_histogram
        .iter()
        .map(|b| b.count)
        .max()
        .unwrap_or(0)
        .max(1);
    for bin in &report.time_histogram {
        println!(
            "  {:>5.0}-{:<5.0} {} {}",
            bin.start,
            bin.end,
            format_bar(bin.count as f64 / widest as f64, BAR_WIDTH),
            bin.count
        );
    }

    Ok(())
}

fn print_rates(title: &str, rows: &[CompletionRate]) {
    println!("\n{}", title);
    for row in rows {
        println!(
            "  {:<12} {}  {:>6} ({}/{})",
            row.label,
            format_bar(row.rate, BAR_WIDTH),
            format_percent(row.rate),
            row.completed,
            row.total
        );
    }
}
