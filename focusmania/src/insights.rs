//! focusmania-insights - which task attributes drive completion
//!
//! Trains the random forest on the whole cleaned log and prints the
//! impurity-based importance of each feature, most important first.

mod common;

use anyhow::{Context, Result};
use clap::Parser;
use common::OutputFormat;
use focusmania_core::format::{format_bar, format_percent};
use focusmania_core::predict::{ForestParams, ModelSnapshot};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "focusmania-insights")]
#[command(about = "Show feature importance of the completion model")]
#[command(version)]
struct Args {
    /// Cleaned task log (defaults to the configured path)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Override the configured number of trees
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    trees: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Serialize)]
struct RankedFeature {
    feature: &'static str,
    importance: f64,
}

#[derive(Serialize)]
struct InsightsOutput<'a> {
    rows: usize,
    trees: usize,
    max_depth: usize,
    categories: &'a [String],
    fingerprint: &'a str,
    importance: Vec<RankedFeature>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (config, _log_guard) = common::init("focusmania-insights")?;

    let path = common::data_path(args.data, &config);
    let records = common::load_records(&path)?;

    let mut params = ForestParams::from(&config.model);
    if let Some(trees) = args.trees {
        params.n_estimators = trees;
    }

    let snapshot = ModelSnapshot::fit(&records, &params).context("failed to train model")?;
    let model = snapshot.model();
    let ranked = snapshot.feature_importance().ranked();

    match args.format {
        OutputFormat::Json => common::print_json(&InsightsOutput {
            rows: snapshot.rows(),
            trees: model.n_trees(),
            max_depth: model.max_depth(),
            categories: snapshot.vocabulary().categories(),
            fingerprint: snapshot.fingerprint(),
            importance: ranked
                .iter()
                .map(|&(feature, importance)| RankedFeature {
                    feature: feature.name(),
                    importance,
                })
                .collect(),
        })?,
        OutputFormat::Text => {
            println!(
                "Random forest: {} trees, max depth {}, trained on {} tasks",
                model.n_trees(),
                model.max_depth(),
                snapshot.rows()
            );
            println!("Categories: {}\n", snapshot.vocabulary().categories().join(", "));
            println!("Feature importance");
            for (feature, weight) in ranked {
                println!(
                    "  {:<16} {}  {:>6}",
                    feature.name(),
                    format_bar(weight, 20),
                    format_percent(weight)
                );
            }
        }
    }

    Ok(())
}
