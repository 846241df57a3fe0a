//! Data validation stage
//!
//! Checks the train and test splits against the declared schema, then looks
//! for distributional drift between them. Structural failures are accumulated
//! across both splits and fail the stage atomically with one aggregated
//! message; drift never fails the stage, it is recorded in the artifact.

use tracing::{info, warn};

use crate::artifact::{DataIngestionArtifact, DataValidationArtifact};
use crate::config::DataValidationConfig;
use crate::drift::{test_column, DriftReport};
use crate::error::{Error, Result};
use crate::frame::DataFrame;
use crate::schema::DataSchema;

pub struct DataValidation {
    config: DataValidationConfig,
    ingestion: DataIngestionArtifact,
    schema: DataSchema,
}

impl DataValidation {
    /// Reads the schema config up front; a missing or malformed schema fails
    /// construction, not the middle of a run
    pub fn new(config: DataValidationConfig, ingestion: DataIngestionArtifact) -> Result<Self> {
        let schema = DataSchema::from_yaml_file(&config.schema_file)?;
        Ok(Self {
            config,
            ingestion,
            schema,
        })
    }

    /// Exact column-count match against the schema
    pub fn validate_column_count(&self, frame: &DataFrame) -> bool {
        frame.n_columns() == self.schema.column_count()
    }

    /// Declared numerical columns absent from the frame
    pub fn missing_numerical_columns(&self, frame: &DataFrame) -> Vec<String> {
        self.schema
            .numerical_columns()
            .iter()
            .filter(|name| frame.numeric_column(name).is_none())
            .cloned()
            .collect()
    }

    /// True when a problem was detected, not when the frame is valid
    pub fn has_missing_numerical_columns(&self, frame: &DataFrame) -> bool {
        !self.missing_numerical_columns(frame).is_empty()
    }

    /// Presence of the label column
    pub fn validate_target_column(&self, frame: &DataFrame) -> bool {
        frame.has_column(self.schema.target_column())
    }

    /// Run the two-sample test on every numeric reference column, write the
    /// report, and return whether any column drifted. Columns absent from the
    /// candidate set are skipped.
    pub fn detect_dataset_drift(
        &self,
        reference: &DataFrame,
        candidate: &DataFrame,
    ) -> Result<bool> {
        let mut report = DriftReport::new();
        for name in reference.column_names() {
            let Some(reference_values) = reference.numeric_column(name) else {
                continue;
            };
            let Some(candidate_values) = candidate.numeric_column(name) else {
                continue;
            };
            let outcome = test_column(
                reference_values,
                candidate_values,
                self.config.drift_threshold,
            );
            if outcome.drift {
                warn!(column = name, p_value = outcome.p_value, "drift detected");
            }
            report.insert(name, outcome);
        }
        report.write_yaml(&self.config.drift_report_file)?;
        Ok(report.drift_detected())
    }

    fn structural_errors(&self, frame: &DataFrame, split: &str) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.validate_column_count(frame) {
            errors.push(format!(
                "number of columns in {split} data ({}) does not match the schema ({})",
                frame.n_columns(),
                self.schema.column_count()
            ));
        }
        let missing = self.missing_numerical_columns(frame);
        if !missing.is_empty() {
            errors.push(format!(
                "missing numerical columns in {split} data: {}",
                missing.join(", ")
            ));
        }
        if !self.validate_target_column(frame) {
            errors.push(format!(
                "target column `{}` is missing in {split} data",
                self.schema.target_column()
            ));
        }
        errors
    }

    pub fn run(self) -> Result<DataValidationArtifact> {
        info!("starting data validation");
        let train = DataFrame::from_csv_path(&self.ingestion.training_file)?;
        let test = DataFrame::from_csv_path(&self.ingestion.testing_file)?;

        let mut errors = self.structural_errors(&train, "training");
        errors.extend(self.structural_errors(&test, "testing"));
        if !errors.is_empty() {
            return Err(Error::Validation(errors.join("\n")));
        }

        // the splits passed every structural check; publish them as the
        // valid inputs downstream stages read from
        train.to_csv_path(&self.config.valid_training_file)?;
        test.to_csv_path(&self.config.valid_testing_file)?;

        let drift_detected = self.detect_dataset_drift(&train, &test)?;
        info!(drift_detected, "data validation completed");

        Ok(DataValidationArtifact {
            drift_detected,
            valid_training_file: self.config.valid_training_file,
            valid_testing_file: self.config.valid_testing_file,
            invalid_training_file: None,
            invalid_testing_file: None,
            drift_report_file: self.config.drift_report_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DataIngestionConfig, TrainingPipelineConfig};
    use crate::frame::Column;
    use chrono::{TimeZone, Utc};
    use std::path::Path;
    use tempfile::tempdir;

    const SCHEMA_YAML: &str = "\
columns:
  - class: category
  - sensor_01: float
  - sensor_02: float
numerical_columns:
  - sensor_01
  - sensor_02
";

    fn make_frame(labels: &[&str], s1: &[f64], s2: &[f64]) -> DataFrame {
        let mut frame = DataFrame::new();
        frame
            .push_column(
                "class",
                Column::Categorical(labels.iter().map(|s| s.to_string()).collect()),
            )
            .unwrap();
        frame
            .push_column("sensor_01", Column::Numeric(s1.to_vec()))
            .unwrap();
        frame
            .push_column("sensor_02", Column::Numeric(s2.to_vec()))
            .unwrap();
        frame
    }

    fn setup(root: &Path, train: &DataFrame, test: &DataFrame) -> (DataValidationConfig, DataIngestionArtifact) {
        let pipeline = TrainingPipelineConfig::at(
            root,
            Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap(),
        );
        std::fs::create_dir_all(pipeline.schema_file.parent().unwrap()).unwrap();
        std::fs::write(&pipeline.schema_file, SCHEMA_YAML).unwrap();

        let ingestion_config = DataIngestionConfig::for_pipeline(&pipeline);
        train.to_csv_path(&ingestion_config.training_file).unwrap();
        test.to_csv_path(&ingestion_config.testing_file).unwrap();

        (
            DataValidationConfig::for_pipeline(&pipeline),
            DataIngestionArtifact {
                training_file: ingestion_config.training_file,
                testing_file: ingestion_config.testing_file,
            },
        )
    }

    #[test]
    fn test_clean_split_produces_artifact_and_report() {
        let dir = tempdir().unwrap();
        let values: Vec<f64> = (0..50).map(f64::from).collect();
        let labels: Vec<&str> = (0..50).map(|i| if i % 2 == 0 { "neg" } else { "pos" }).collect();
        let train = make_frame(&labels, &values, &values);
        let test = make_frame(&labels, &values, &values);

        let (config, ingestion) = setup(dir.path(), &train, &test);
        let artifact = DataValidation::new(config, ingestion).unwrap().run().unwrap();

        assert!(!artifact.drift_detected);
        assert!(artifact.valid_training_file.exists());
        assert!(artifact.valid_testing_file.exists());
        assert!(artifact.drift_report_file.exists());
        assert!(artifact.invalid_training_file.is_none());

        let report = DriftReport::read_yaml(&artifact.drift_report_file).unwrap();
        assert_eq!(report.len(), 2);
        let sensor = report.column("sensor_01").unwrap();
        assert!(sensor.p_value > 0.99);
        assert!(!sensor.drift);
    }

    #[test]
    fn test_disjoint_distributions_flag_drift() {
        let dir = tempdir().unwrap();
        let reference: Vec<f64> = (0..60).map(f64::from).collect();
        let shifted: Vec<f64> = (5000..5060).map(f64::from).collect();
        let labels: Vec<&str> = (0..60).map(|_| "neg").collect();
        let train = make_frame(&labels, &reference, &reference);
        let test = make_frame(&labels, &shifted, &reference);

        let (config, ingestion) = setup(dir.path(), &train, &test);
        let artifact = DataValidation::new(config, ingestion).unwrap().run().unwrap();

        assert!(artifact.drift_detected);
        let report = DriftReport::read_yaml(&artifact.drift_report_file).unwrap();
        assert!(report.column("sensor_01").unwrap().drift);
        assert!(!report.column("sensor_02").unwrap().drift);
    }

    #[test]
    fn test_structural_failures_aggregate_and_fail_atomically() {
        let dir = tempdir().unwrap();
        // both splits lack sensor_02 and the target column
        let mut bad = DataFrame::new();
        bad.push_column("sensor_01", Column::Numeric(vec![1.0, 2.0])).unwrap();

        let (config, ingestion) = setup(dir.path(), &bad, &bad);
        let valid_training_file = config.valid_training_file.clone();
        let drift_report_file = config.drift_report_file.clone();
        let err = DataValidation::new(config, ingestion).unwrap().run().unwrap_err();

        let message = err.to_string();
        assert!(message.contains("number of columns in training data"));
        assert!(message.contains("missing numerical columns in training data: sensor_02"));
        assert!(message.contains("target column `class` is missing in training data"));
        assert!(message.contains("number of columns in testing data"));
        // no partial outputs when the stage fails
        assert!(!valid_training_file.exists());
        assert!(!drift_report_file.exists());
    }

    #[test]
    fn test_column_count_check_polarity() {
        let dir = tempdir().unwrap();
        let train = make_frame(&["neg"], &[1.0], &[1.0]);
        let (config, ingestion) = setup(dir.path(), &train, &train);
        let validation = DataValidation::new(config, ingestion).unwrap();

        assert!(validation.validate_column_count(&train));
        let narrower = train.without_columns(&["sensor_02".into()]);
        assert!(!validation.validate_column_count(&narrower));
        // missing-column check answers "problem detected"
        assert!(validation.has_missing_numerical_columns(&narrower));
        assert!(!validation.has_missing_numerical_columns(&train));
    }
}
