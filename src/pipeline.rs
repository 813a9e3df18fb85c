//! # Assessment Pipeline
//!
//! The process-wide engine behind the predictor: fit (or adopt) a model
//! once, then assess any number of questionnaire submissions against it.
//! This module also owns the pipeline's error taxonomy and the wire payloads
//! emitted by the predictor binary.
//!
//! Input decoding is deliberately two-staged. The raw argument must first be
//! syntactically valid JSON; that failure belongs to the caller and is the
//! predictor's only hard-exit path. A payload that is valid JSON but the
//! wrong shape fails in the second stage, inside the blanket-recovery
//! surface, and degrades to the fallback payload like any other internal
//! fault.

use crate::answers::{Answer, FeatureSet};
use crate::model::{ModelConfig, ModelError, TrainedModel};
use crate::recommend;
use crate::synthesis::{synthesize, SynthesisConfig};
use serde::Serialize;
use thiserror::Error;

/// Score reported by the degraded failure payload.
pub const FALLBACK_SCORE: u8 = 50;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The raw input text is not valid JSON. Reported on stdout with a
    /// non-zero exit; nothing else exits non-zero.
    #[error("Failed to parse input data: {0}")]
    Parse(serde_json::Error),
    /// Any fault after the input text was decoded.
    #[error("An error occurred: {0}")]
    Computation(#[from] ComputationError),
}

#[derive(Error, Debug)]
pub enum ComputationError {
    #[error("answers payload has an unexpected shape: {0}")]
    AnswerShape(serde_json::Error),
    #[error("model training or prediction failed: {0}")]
    Model(#[from] ModelError),
}

impl From<ModelError> for PipelineError {
    fn from(error: ModelError) -> Self {
        PipelineError::Computation(ComputationError::Model(error))
    }
}

/// Decodes the predictor's single argument into answers.
///
/// Stage one checks JSON syntax, stage two checks payload shape; the two
/// stages fail into different [`PipelineError`] variants on purpose.
pub fn parse_answers(raw: &str) -> Result<Vec<Answer>, PipelineError> {
    let payload: serde_json::Value = serde_json::from_str(raw).map_err(PipelineError::Parse)?;
    let answers = serde_json::from_value(payload).map_err(ComputationError::AnswerShape)?;
    Ok(answers)
}

/// A completed stress assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Clamped, rounded score in 0..=100.
    pub score: u8,
    /// Selected advice, fixed rule order.
    pub recommendations: Vec<String>,
}

/// Payload emitted when assessment fails after input decoding: a plausible
/// default result carrying the error text, delivered on a success exit code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackResult {
    pub error: String,
    pub score: u8,
    pub recommendations: Vec<String>,
}

impl FallbackResult {
    pub fn for_error(error: &PipelineError) -> Self {
        Self {
            error: error.to_string(),
            score: FALLBACK_SCORE,
            recommendations: vec![recommend::FALLBACK.to_string()],
        }
    }
}

/// A fitted model with an explicit lifecycle: constructed once per process,
/// reused for any number of assessments.
pub struct ScoreEngine {
    model: TrainedModel,
}

impl ScoreEngine {
    /// Fits a fresh model on a synthesized corpus.
    pub fn train(synthesis: &SynthesisConfig, config: ModelConfig) -> Result<Self, ModelError> {
        let rows = synthesize(synthesis);
        let model = TrainedModel::train(&rows, config)?;
        Ok(Self { model })
    }

    /// Adopts an already fitted model, typically loaded from an artifact
    /// file.
    pub fn from_model(model: TrainedModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    /// Runs one assessment: map answers to features, predict, clamp and
    /// round the score, then select recommendations.
    pub fn assess(&self, answers: &[Answer]) -> Result<PredictionResult, ComputationError> {
        let features = FeatureSet::from_answers(answers);
        let raw = self.model.predict(&features)?;
        let score = clamp_score(raw);
        log::debug!("Raw prediction {raw:.3} reported as {score}.");
        let recommendations = recommend::recommendations_for(&features, score);
        Ok(PredictionResult {
            score,
            recommendations,
        })
    }
}

/// Clamps a raw ensemble output into the reportable 0..=100 integer range,
/// rounding half away from zero.
pub fn clamp_score(raw: f64) -> u8 {
    raw.clamp(0.0, 100.0).round() as u8
}
