//! # Model Training and Persistence
//!
//! Defines the complete, self-contained artifact of a trained stress model
//! and the training routine that produces it. The artifact captures both the
//! structural blueprint ([`ModelConfig`]) and every data-dependent parameter
//! (the fitted encoder and forest), so a loaded model predicts exactly like
//! the model that was saved.
//!
//! Artifacts are written as human-readable TOML in the same spirit as the
//! rest of the toolchain's on-disk formats.

use crate::answers::{FeatureSet, NUMERIC_FEATURES};
use crate::encode::{EncodeError, OneHotEncoder};
use crate::forest::{ForestConfig, ForestError, RandomForest};
use ndarray::{aview1, Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// One labelled training row: survey features plus the observed target.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRow {
    pub features: FeatureSet,
    pub stress_score: f64,
}

/// The structural blueprint of a model, fixed before training begins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    pub forest: ForestConfig,
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read or write model file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML model file: {0}")]
    TomlParseError(#[from] toml::de::Error),
    #[error("Failed to serialize model to TOML format: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
    #[error("Cannot train a model on an empty set of rows.")]
    EmptyTrainingSet,
    #[error("Feature encoding failed: {0}")]
    EncodeError(#[from] EncodeError),
    #[error("Forest construction failed: {0}")]
    ForestError(#[from] ForestError),
    #[error("Input row has {found} encoded features, but the model expects {expected}.")]
    MismatchedFeatureCount { found: usize, expected: usize },
}

/// The top-level trained model artifact.
///
/// This is the structure that gets saved to and loaded from disk; everything
/// prediction needs travels inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub config: ModelConfig,
    pub encoder: OneHotEncoder,
    pub forest: RandomForest,
}

impl TrainedModel {
    /// Fits the categorical encoder and the forest over labelled rows.
    pub fn train(rows: &[TrainingRow], config: ModelConfig) -> Result<Self, ModelError> {
        if rows.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }

        let mut balance_column = Vec::with_capacity(rows.len());
        let mut relaxation_column = Vec::with_capacity(rows.len());
        for row in rows {
            let [balance, relaxation] = row.features.categorical_values();
            balance_column.push(balance.to_string());
            relaxation_column.push(relaxation.to_string());
        }
        let encoder = OneHotEncoder::fit(&[balance_column, relaxation_column])?;

        let width = NUMERIC_FEATURES.len() + encoder.width();
        let mut design = Vec::with_capacity(rows.len() * width);
        for row in rows {
            design.extend(encode_features(&row.features, &encoder)?);
        }
        let x = Array2::from_shape_vec((rows.len(), width), design)
            .expect("every encoded row has the same width");
        let y = Array1::from_iter(rows.iter().map(|row| row.stress_score));

        let forest = RandomForest::fit(x.view(), y.view(), &config.forest)?;
        log::info!(
            "Trained {} trees on {} rows with {} encoded features.",
            forest.tree_count(),
            rows.len(),
            width
        );
        Ok(Self {
            config,
            encoder,
            forest,
        })
    }

    /// Width of the encoded feature vector this model expects.
    pub fn feature_width(&self) -> usize {
        NUMERIC_FEATURES.len() + self.encoder.width()
    }

    /// Raw ensemble output for one survey record. No clamping or rounding.
    pub fn predict(&self, features: &FeatureSet) -> Result<f64, ModelError> {
        let row = encode_features(features, &self.encoder)?;
        Ok(self.forest.predict_row(aview1(&row)))
    }

    /// Raw ensemble output for an already encoded feature vector.
    pub fn predict_encoded(&self, row: &[f64]) -> Result<f64, ModelError> {
        if row.len() != self.feature_width() {
            return Err(ModelError::MismatchedFeatureCount {
                found: row.len(),
                expected: self.feature_width(),
            });
        }
        Ok(self.forest.predict_row(aview1(row)))
    }

    /// Saves the complete model to a human-readable TOML file.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut file = BufWriter::new(fs::File::create(path)?);
        file.write_all(toml_string.as_bytes())?;
        Ok(())
    }

    /// Loads a complete model from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let toml_string = fs::read_to_string(path)?;
        let model = toml::from_str(&toml_string)?;
        Ok(model)
    }
}

/// Encodes one survey record into the model's dense layout: numeric columns
/// first, then the one-hot blocks. Training and prediction share this path,
/// so the two layouts cannot drift apart.
fn encode_features(features: &FeatureSet, encoder: &OneHotEncoder) -> Result<Vec<f64>, EncodeError> {
    let mut row = features.numeric_values().to_vec();
    row.extend(encoder.transform_row(&features.categorical_values())?);
    Ok(row)
}
