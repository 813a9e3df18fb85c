//! # Synthetic Training Corpus
//!
//! Generates the simulated stress-survey table that the end-to-end predictor
//! trains on. The simulated relationship is fixed: each feature contributes
//! an additive effect to the target, Gaussian noise is layered on top, and
//! the result is clipped to the reportable score range. Generation is fully
//! deterministic for a given [`SynthesisConfig`].

use crate::answers::{FeatureSet, RelaxationFrequency, WorkLifeBalance};
use crate::model::TrainingRow;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;

/// Size and reproducibility of the synthesized corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisConfig {
    /// Number of rows to generate.
    pub samples: usize,
    /// Seed for every random draw, including the target noise.
    pub seed: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            samples: 1000,
            seed: 42,
        }
    }
}

/// Standard deviation of the Gaussian noise added to the simulated target.
const SCORE_NOISE_SD: f64 = 5.0;

/// Draws a labelled survey corpus from the simulated distribution.
///
/// Features are drawn column by column, then targets are assembled row by
/// row, so every column is a contiguous run of draws from one distribution.
pub fn synthesize(config: &SynthesisConfig) -> Vec<TrainingRow> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let n = config.samples;

    let stress_level: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..10.0)).collect();
    let sleep_hours: Vec<f64> = (0..n).map(|_| rng.gen_range(4.0..10.0)).collect();
    let exercise_days: Vec<i64> = (0..n).map(|_| rng.gen_range(0..8)).collect();
    let work_life_balance: Vec<WorkLifeBalance> = (0..n)
        .map(|_| WorkLifeBalance::ALL[rng.gen_range(0..WorkLifeBalance::ALL.len())])
        .collect();
    let relaxation: Vec<RelaxationFrequency> = (0..n)
        .map(|_| RelaxationFrequency::ALL[rng.gen_range(0..RelaxationFrequency::ALL.len())])
        .collect();

    let noise = Normal::new(0.0, SCORE_NOISE_SD).expect("noise standard deviation is positive");

    (0..n)
        .map(|row| {
            let features = FeatureSet {
                stress_level: stress_level[row],
                sleep_hours: sleep_hours[row],
                exercise_days: exercise_days[row],
                work_life_balance: work_life_balance[row],
                relaxation: relaxation[row],
            };
            let raw = simulated_score(&features) + rng.sample(noise);
            TrainingRow {
                stress_score: raw.clamp(0.0, 100.0),
                features,
            }
        })
        .collect()
}

/// The noiseless simulated relationship between survey features and target.
fn simulated_score(features: &FeatureSet) -> f64 {
    let balance_effect = match features.work_life_balance {
        WorkLifeBalance::Poor => 20.0,
        WorkLifeBalance::Fair => 15.0,
        WorkLifeBalance::Good => 7.0,
        WorkLifeBalance::Excellent => 0.0,
    };
    let relaxation_effect = match features.relaxation {
        RelaxationFrequency::Never => 15.0,
        RelaxationFrequency::Rarely => 10.0,
        RelaxationFrequency::Sometimes => 7.0,
        RelaxationFrequency::Often => 3.0,
        RelaxationFrequency::Daily => 0.0,
    };
    features.stress_level * 5.0
        + (40.0 - features.sleep_hours * 5.0).max(0.0)
        + (25.0 - features.exercise_days as f64 * 3.5).max(0.0)
        + balance_effect
        + relaxation_effect
}
