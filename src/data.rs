//! # Training Data Loading and Validation
//!
//! The exclusive entry point for user-provided survey CSV data. Its job is
//! to either produce clean, validated training rows or fail with an error
//! that tells the user exactly what is wrong with their file.
//!
//! - Strict Schema: all five feature columns and the target column must be
//!   present under their exact, case-sensitive names.
//! - Fail Fast: the first invalid cell aborts the load with its row number,
//!   rather than training on silently patched data.

use crate::answers::{FeatureSet, RelaxationFrequency, WorkLifeBalance};
use crate::model::TrainingRow;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

/// Column header of the regression target.
pub const TARGET_COLUMN: &str = "Stress Level";

/// Required feature column headers, in design order.
pub const FEATURE_COLUMNS: [&str; 5] = [
    "stress_level",
    "sleep_hours",
    "exercise_days",
    "work_life_balance",
    "relaxation",
];

/// Fewer rows than this cannot support a holdout split worth reporting.
const MINIMUM_ROWS: usize = 20;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to open training data: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to read CSV data: {0}")]
    CsvError(#[from] csv::Error),
    #[error(
        "The required column '{0}' was not found in the input file. Please check spelling and case."
    )]
    ColumnNotFound(String),
    #[error("Row {row}: column '{column}' holds '{value}', which is not a recognized category.")]
    InvalidCategory {
        row: usize,
        column: String,
        value: String,
    },
    #[error(
        "Row {row}: column '{column}' holds a non-finite value. All numeric data must be finite."
    )]
    NonFiniteValue { row: usize, column: String },
    #[error(
        "Input file contains only {found} data rows, but at least {required} are required to train and evaluate a model."
    )]
    InsufficientRows { found: usize, required: usize },
}

/// One raw CSV record under the strict schema.
#[derive(Debug, Deserialize)]
struct SurveyRecord {
    stress_level: f64,
    sleep_hours: f64,
    exercise_days: f64,
    work_life_balance: String,
    relaxation: String,
    #[serde(rename = "Stress Level")]
    stress_score: f64,
}

/// Loads and validates survey rows for model training.
pub fn load_training_rows(path: &Path) -> Result<Vec<TrainingRow>, DataError> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    verify_headers(reader.headers()?)?;

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<SurveyRecord>().enumerate() {
        // Row numbers are 1-based and exclude the header line.
        rows.push(validate_record(record?, index + 1)?);
    }
    if rows.len() < MINIMUM_ROWS {
        return Err(DataError::InsufficientRows {
            found: rows.len(),
            required: MINIMUM_ROWS,
        });
    }
    log::info!("Loaded {} validated survey rows.", rows.len());
    Ok(rows)
}

/// Checks that every required column is present before any row is parsed, so
/// a misnamed header is reported as such instead of as a field error.
fn verify_headers(headers: &csv::StringRecord) -> Result<(), DataError> {
    let names: Vec<&str> = headers.iter().collect();
    for required in FEATURE_COLUMNS.iter().copied().chain([TARGET_COLUMN]) {
        if !names.contains(&required) {
            return Err(DataError::ColumnNotFound(required.to_string()));
        }
    }
    Ok(())
}

fn validate_record(record: SurveyRecord, row: usize) -> Result<TrainingRow, DataError> {
    let numeric_cells = [
        ("stress_level", record.stress_level),
        ("sleep_hours", record.sleep_hours),
        ("exercise_days", record.exercise_days),
        (TARGET_COLUMN, record.stress_score),
    ];
    for (column, value) in numeric_cells {
        if !value.is_finite() {
            return Err(DataError::NonFiniteValue {
                row,
                column: column.to_string(),
            });
        }
    }

    let work_life_balance = WorkLifeBalance::parse(&record.work_life_balance).ok_or_else(|| {
        DataError::InvalidCategory {
            row,
            column: "work_life_balance".to_string(),
            value: record.work_life_balance.clone(),
        }
    })?;
    let relaxation = RelaxationFrequency::parse(&record.relaxation).ok_or_else(|| {
        DataError::InvalidCategory {
            row,
            column: "relaxation".to_string(),
            value: record.relaxation.clone(),
        }
    })?;

    Ok(TrainingRow {
        features: FeatureSet {
            stress_level: record.stress_level,
            sleep_hours: record.sleep_hours,
            exercise_days: record.exercise_days.trunc() as i64,
            work_life_balance,
            relaxation,
        },
        stress_score: record.stress_score,
    })
}

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub name: &'static str,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Per-column statistics over the numeric columns and the target, in schema
/// order.
pub fn numeric_summaries(rows: &[TrainingRow]) -> Vec<ColumnSummary> {
    let columns: [(&'static str, Vec<f64>); 4] = [
        (
            "stress_level",
            rows.iter().map(|row| row.features.stress_level).collect(),
        ),
        (
            "sleep_hours",
            rows.iter().map(|row| row.features.sleep_hours).collect(),
        ),
        (
            "exercise_days",
            rows.iter()
                .map(|row| row.features.exercise_days as f64)
                .collect(),
        ),
        (
            TARGET_COLUMN,
            rows.iter().map(|row| row.stress_score).collect(),
        ),
    ];
    columns
        .into_iter()
        .map(|(name, values)| summarize(name, &values))
        .collect()
}

fn summarize(name: &'static str, values: &[f64]) -> ColumnSummary {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    // Sample variance, matching the convention of common dataframe tooling.
    let variance =
        values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / (n - 1.0).max(1.0);
    ColumnSummary {
        name,
        count: values.len(),
        mean,
        std: variance.sqrt(),
        min: values.iter().fold(f64::INFINITY, |a, &b| a.min(b)),
        max: values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "stress_level,sleep_hours,exercise_days,work_life_balance,relaxation,Stress Level";

    fn write_csv(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn plain_rows(count: usize) -> Vec<String> {
        (0..count)
            .map(|index| {
                format!(
                    "{},{},{},Fair,Sometimes,{}",
                    index % 10,
                    4 + index % 6,
                    index % 7,
                    (index % 10) * 9
                )
            })
            .collect()
    }

    #[test]
    fn valid_file_loads_every_row() {
        let lines = plain_rows(25);
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let file = write_csv(&refs);

        let rows = load_training_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 25);
        assert_eq!(rows[3].features.exercise_days, 3);
        assert_eq!(rows[3].stress_score, 27.0);
        assert_eq!(rows[3].features.work_life_balance, WorkLifeBalance::Fair);
    }

    #[test]
    fn missing_required_column_is_reported_by_name() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "stress_level,sleep_hours,exercise_days,work_life_balance,Stress Level"
        )
        .unwrap();
        writeln!(file, "5,7,3,Fair,50").unwrap();
        file.flush().unwrap();

        let err = load_training_rows(file.path()).unwrap_err();
        match err {
            DataError::ColumnNotFound(column) => assert_eq!(column, "relaxation"),
            other => panic!("Expected ColumnNotFound, got {:?}", other),
        }
    }

    #[test]
    fn unrecognized_category_is_reported_with_its_row() {
        let mut lines = plain_rows(25);
        lines[4] = "5,7,3,Mediocre,Sometimes,50".to_string();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let file = write_csv(&refs);

        let err = load_training_rows(file.path()).unwrap_err();
        match err {
            DataError::InvalidCategory { row, column, value } => {
                assert_eq!(row, 5);
                assert_eq!(column, "work_life_balance");
                assert_eq!(value, "Mediocre");
            }
            other => panic!("Expected InvalidCategory, got {:?}", other),
        }
    }

    #[test]
    fn non_finite_numeric_cell_is_rejected() {
        let mut lines = plain_rows(25);
        lines[0] = "NaN,7,3,Fair,Sometimes,50".to_string();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let file = write_csv(&refs);

        let err = load_training_rows(file.path()).unwrap_err();
        match err {
            DataError::NonFiniteValue { row, column } => {
                assert_eq!(row, 1);
                assert_eq!(column, "stress_level");
            }
            other => panic!("Expected NonFiniteValue, got {:?}", other),
        }
    }

    #[test]
    fn too_few_rows_are_rejected() {
        let lines = plain_rows(5);
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let file = write_csv(&refs);

        let err = load_training_rows(file.path()).unwrap_err();
        match err {
            DataError::InsufficientRows { found, required } => {
                assert_eq!(found, 5);
                assert_eq!(required, 20);
            }
            other => panic!("Expected InsufficientRows, got {:?}", other),
        }
    }

    #[test]
    fn unparseable_numeric_cell_is_a_csv_error() {
        let mut lines = plain_rows(25);
        lines[2] = "lots,7,3,Fair,Sometimes,50".to_string();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let file = write_csv(&refs);

        let err = load_training_rows(file.path()).unwrap_err();
        assert!(matches!(err, DataError::CsvError(_)));
    }

    #[test]
    fn summaries_report_sample_statistics() {
        let rows: Vec<TrainingRow> = [10.0_f64, 20.0, 30.0]
            .iter()
            .map(|&target| TrainingRow {
                features: FeatureSet::DEFAULT,
                stress_score: target,
            })
            .collect();
        let summaries = numeric_summaries(&rows);
        let target = summaries
            .iter()
            .find(|summary| summary.name == TARGET_COLUMN)
            .unwrap();
        assert_eq!(target.mean, 20.0);
        assert_eq!(target.min, 10.0);
        assert_eq!(target.max, 30.0);
        // Sample standard deviation of {10, 20, 30}.
        assert_eq!(target.std, 10.0);
    }
}
