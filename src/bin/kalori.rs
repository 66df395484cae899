//! Command-line shell around the calorie estimation core.
//!
//! One estimate per invocation: parse four macronutrient quantities, load
//! the artifact pair, print the estimate. With `--goal` the remaining daily
//! budget after this item is printed as well.

use clap::Parser;
use kalori::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "kalori",
    version,
    about = "Estimate food calories from macronutrients"
)]
struct Cli {
    /// Fat (grams)
    #[arg(long)]
    fat: f32,

    /// Carbohydrate (grams)
    #[arg(long)]
    carb: f32,

    /// Protein (grams)
    #[arg(long)]
    protein: f32,

    /// Sugars (grams)
    #[arg(long)]
    sugars: f32,

    /// Daily calorie goal (kcal); prints the remaining budget when set
    #[arg(long)]
    goal: Option<f32>,

    /// Scaler artifact path (default: $KALORI_SCALER_PATH or scaler_kalori.safetensors)
    #[arg(long)]
    scaler: Option<PathBuf>,

    /// Model artifact path (default: $KALORI_MODEL_PATH or model_kalori.safetensors)
    #[arg(long)]
    model: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut paths = ArtifactPaths::from_env();
    if let Some(scaler) = cli.scaler {
        paths.scaler = scaler;
    }
    if let Some(model) = cli.model {
        paths.model = model;
    }

    let store = ArtifactStore::new(paths);
    if let Err(e) = store.load() {
        eprintln!("kalori: {e}");
        return ExitCode::FAILURE;
    }

    match estimate_calories(&store, cli.fat, cli.carb, cli.protein, cli.sugars) {
        Ok(kcal) => {
            println!("{kcal:.0} kcal");
            if let Some(goal) = cli.goal {
                let tracker = DailyTracker::new(goal);
                tracker.add(kcal);
                println!("{:.0} kcal left of {goal:.0}", tracker.remaining());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("kalori: {e}");
            ExitCode::FAILURE
        }
    }
}
