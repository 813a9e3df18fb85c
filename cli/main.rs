#![deny(unused_variables)]
#![deny(dead_code)]
#![deny(unused_imports)]

use clap::{Parser, Subcommand};
use manometer::data::{load_training_rows, numeric_summaries, TARGET_COLUMN};
use manometer::forest::ForestConfig;
use manometer::model::{ModelConfig, TrainedModel, TrainingRow};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::Path;
use std::process;

/// Artifact filename shared by `train` and `infer`.
const MODEL_FILE: &str = "stress_model.toml";

#[derive(Parser)]
#[command(
    name = "manometer-calibrate",
    about = "Train and apply stress score models from survey data",
    long_about = "A tool for fitting ensemble regression models to stress survey data \
                 and applying them to encoded feature vectors."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new model from survey data
    #[command(about = "Train a stress model (outputs: stress_model.toml)")]
    Train {
        /// Path to training CSV file with survey feature columns and a
        /// 'Stress Level' target column
        #[arg(default_value = "stress.csv")]
        training_data: String,

        /// Number of trees in the ensemble
        #[arg(long, default_value = "100")]
        trees: usize,

        /// Seed for bootstrap resampling and the holdout split
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Fraction of rows held out for evaluation
        #[arg(long, default_value = "0.2")]
        holdout: f64,
    },

    /// Apply a trained model to one encoded feature vector
    #[command(about = "Apply a trained model (prints the raw prediction)")]
    Infer {
        /// JSON array of encoded feature values, numeric columns first, then
        /// the one-hot blocks in the model's category order
        features: String,

        /// Path to trained model file (.toml)
        #[arg(long, default_value = MODEL_FILE)]
        model: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Train {
            training_data,
            trees,
            seed,
            holdout,
        } => train_command(&training_data, trees, seed, holdout),
        Commands::Infer { features, model } => infer_command(&features, &model),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn train_command(
    training_data_path: &str,
    trees: usize,
    seed: u64,
    holdout: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading training data from: {}", training_data_path);

    let rows = load_training_rows(Path::new(training_data_path))?;
    println!("Loaded {} survey rows", rows.len());

    print_preview(&rows);
    print_summaries(&rows);

    // Hold out an evaluation slice before any fitting happens
    let (train_rows, holdout_rows) = holdout_split(&rows, holdout, seed);
    println!(
        "Training on {} rows, holding out {}",
        train_rows.len(),
        holdout_rows.len()
    );

    let config = ModelConfig {
        forest: ForestConfig {
            trees,
            seed,
            ..ForestConfig::default()
        },
    };

    println!("Training model with {} trees...", trees);
    let trained_model = TrainedModel::train(&train_rows, config)?;

    if holdout_rows.is_empty() {
        println!("No holdout rows; skipping evaluation");
    } else {
        let mse = mean_squared_error(&trained_model, &holdout_rows)?;
        println!("Mean squared error on held-out rows: {:.4}", mse);
    }

    trained_model.save(Path::new(MODEL_FILE))?;
    println!("Model saved to: {}", MODEL_FILE);

    Ok(())
}

fn infer_command(features_json: &str, model_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    // Progress goes to stderr; stdout carries only the predicted value.
    eprintln!("> Loading model from: {}", model_path);
    let model = TrainedModel::load(Path::new(model_path))?;
    eprintln!(
        "> Model expects {} encoded features ({} trees)",
        model.feature_width(),
        model.forest.tree_count()
    );

    let features: Vec<f64> = serde_json::from_str(features_json)?;
    let prediction = model.predict_encoded(&features)?;

    println!("{}", prediction);
    Ok(())
}

/// Shuffles row indices with a seeded RNG, then carves off the holdout
/// fraction (rounded up) for evaluation.
fn holdout_split(
    rows: &[TrainingRow],
    holdout: f64,
    seed: u64,
) -> (Vec<TrainingRow>, Vec<TrainingRow>) {
    let mut indices: Vec<usize> = (0..rows.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let holdout_len = ((rows.len() as f64) * holdout.clamp(0.0, 1.0)).ceil() as usize;
    // Never hold out the entire file.
    let holdout_len = holdout_len.min(rows.len().saturating_sub(1));

    let (holdout_indices, train_indices) = indices.split_at(holdout_len);
    let collect = |slice: &[usize]| slice.iter().map(|&index| rows[index].clone()).collect();
    (collect(train_indices), collect(holdout_indices))
}

fn mean_squared_error(
    model: &TrainedModel,
    rows: &[TrainingRow],
) -> Result<f64, Box<dyn std::error::Error>> {
    let mut total = 0.0;
    for row in rows {
        let prediction = model.predict(&row.features)?;
        total += (prediction - row.stress_score).powi(2);
    }
    Ok(total / rows.len() as f64)
}

/// Prints the first few rows in a fixed-width table, header included.
fn print_preview(rows: &[TrainingRow]) {
    println!(
        "{:>12} {:>11} {:>13} {:>17} {:>10} {:>12}",
        "stress_level", "sleep_hours", "exercise_days", "work_life_balance", "relaxation", TARGET_COLUMN
    );
    for row in rows.iter().take(5) {
        println!(
            "{:>12.2} {:>11.2} {:>13} {:>17} {:>10} {:>12.2}",
            row.features.stress_level,
            row.features.sleep_hours,
            row.features.exercise_days,
            row.features.work_life_balance.as_str(),
            row.features.relaxation.as_str(),
            row.stress_score
        );
    }
}

/// Prints per-column descriptive statistics for the numeric columns.
fn print_summaries(rows: &[TrainingRow]) {
    println!(
        "{:>13} {:>8} {:>10} {:>10} {:>10} {:>10}",
        "column", "count", "mean", "std", "min", "max"
    );
    for summary in numeric_summaries(rows) {
        println!(
            "{:>13} {:>8} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
            summary.name, summary.count, summary.mean, summary.std, summary.min, summary.max
        );
    }
}
