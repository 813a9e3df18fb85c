//! # Questionnaire Answer Intake and Feature Mapping
//!
//! This module is the typed boundary for user-submitted questionnaire data.
//! It defines the wire shape of a single answer, the closed categorical
//! vocabularies, and the fixed `FeatureSet` record consumed by the model.
//!
//! - Lenient Mapping: mapping never fails. A wrong-typed or out-of-range
//!   value falls back to the documented default for that field, and answers
//!   with unrecognized question IDs are skipped.
//! - Closed Vocabularies: categorical answers parse into enums, so nothing
//!   downstream handles free-form category strings.

use serde::Deserialize;

/// One submitted questionnaire item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Answer {
    #[serde(rename = "questionId")]
    pub question_id: i64,
    pub value: AnswerValue,
}

/// The value side of an [`Answer`].
///
/// The wire format promises a number or a string. Anything else is still
/// accepted and preserved here, so the mapper can substitute the per-field
/// default instead of rejecting the whole payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Text(String),
    /// Any other JSON value (null, bool, nested structure). Never passes a
    /// type check, so the target field keeps its default.
    Other(serde_json::Value),
}

impl AnswerValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Self-described work-life balance (question 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkLifeBalance {
    Poor,
    #[default]
    Fair,
    Good,
    Excellent,
}

impl WorkLifeBalance {
    pub const ALL: [WorkLifeBalance; 4] = [
        WorkLifeBalance::Poor,
        WorkLifeBalance::Fair,
        WorkLifeBalance::Good,
        WorkLifeBalance::Excellent,
    ];

    /// Canonical spelling used on the wire and in training data.
    pub fn as_str(self) -> &'static str {
        match self {
            WorkLifeBalance::Poor => "Poor",
            WorkLifeBalance::Fair => "Fair",
            WorkLifeBalance::Good => "Good",
            WorkLifeBalance::Excellent => "Excellent",
        }
    }

    /// Exact, case-sensitive match on the canonical spelling.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|member| member.as_str() == value)
    }
}

/// How often relaxation techniques are practiced (question 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelaxationFrequency {
    Never,
    Rarely,
    #[default]
    Sometimes,
    Often,
    Daily,
}

impl RelaxationFrequency {
    pub const ALL: [RelaxationFrequency; 5] = [
        RelaxationFrequency::Never,
        RelaxationFrequency::Rarely,
        RelaxationFrequency::Sometimes,
        RelaxationFrequency::Often,
        RelaxationFrequency::Daily,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RelaxationFrequency::Never => "Never",
            RelaxationFrequency::Rarely => "Rarely",
            RelaxationFrequency::Sometimes => "Sometimes",
            RelaxationFrequency::Often => "Often",
            RelaxationFrequency::Daily => "Daily",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|member| member.as_str() == value)
    }
}

/// Names of the numeric design-matrix columns, in order.
pub const NUMERIC_FEATURES: [&str; 3] = ["stress_level", "sleep_hours", "exercise_days"];

/// The fixed five-field record derived from questionnaire answers.
///
/// Every field is always populated: either with a parsed answer value or
/// with the default documented on [`FeatureSet::DEFAULT`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    /// Self-rated current stress, 0-10 scale (question 1).
    pub stress_level: f64,
    /// Hours of sleep last night (question 2).
    pub sleep_hours: f64,
    /// Exercise sessions this week; numeric answers truncate toward zero
    /// (question 3).
    pub exercise_days: i64,
    pub work_life_balance: WorkLifeBalance,
    pub relaxation: RelaxationFrequency,
}

impl FeatureSet {
    /// Field defaults substituted for missing, wrong-typed, or out-of-range
    /// answers.
    pub const DEFAULT: FeatureSet = FeatureSet {
        stress_level: 5.0,
        sleep_hours: 7.0,
        exercise_days: 3,
        work_life_balance: WorkLifeBalance::Fair,
        relaxation: RelaxationFrequency::Sometimes,
    };

    /// Maps raw answers onto a feature record.
    ///
    /// Answers are applied in submission order, so a repeated `questionId`
    /// is last-write-wins, and a later wrong-typed answer resets its field
    /// back to the default. Never fails; an empty list yields
    /// [`FeatureSet::DEFAULT`].
    pub fn from_answers(answers: &[Answer]) -> Self {
        let mut features = Self::DEFAULT;
        for answer in answers {
            match answer.question_id {
                // Current stress level
                1 => {
                    features.stress_level = answer
                        .value
                        .as_number()
                        .unwrap_or(Self::DEFAULT.stress_level);
                }
                // Sleep hours
                2 => {
                    features.sleep_hours = answer
                        .value
                        .as_number()
                        .unwrap_or(Self::DEFAULT.sleep_hours);
                }
                // Exercise frequency
                3 => {
                    features.exercise_days = answer
                        .value
                        .as_number()
                        .map_or(Self::DEFAULT.exercise_days, |value| value.trunc() as i64);
                }
                // Work-life balance
                4 => {
                    features.work_life_balance = answer
                        .value
                        .as_text()
                        .and_then(WorkLifeBalance::parse)
                        .unwrap_or_default();
                }
                // Relaxation techniques
                5 => {
                    features.relaxation = answer
                        .value
                        .as_text()
                        .and_then(RelaxationFrequency::parse)
                        .unwrap_or_default();
                }
                // Unrecognized questionnaire item; skip silently.
                _ => {}
            }
        }
        features
    }

    /// The three numeric columns in design-matrix order.
    pub fn numeric_values(&self) -> [f64; 3] {
        [
            self.stress_level,
            self.sleep_hours,
            self.exercise_days as f64,
        ]
    }

    /// The two categorical columns in design-matrix order.
    pub fn categorical_values(&self) -> [&'static str; 2] {
        [self.work_life_balance.as_str(), self.relaxation.as_str()]
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::DEFAULT
    }
}
