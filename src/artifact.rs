//! Stage artifacts
//!
//! Each completed stage hands the next stage an immutable record of what was
//! produced and where it lives on disk, never the data itself. A stage only
//! constructs its artifact after every referenced path has been written, so
//! an artifact in hand means the files exist.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::metrics::ClassificationMetrics;

/// Output of data ingestion: the cleaned train/test split on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataIngestionArtifact {
    pub training_file: PathBuf,
    pub testing_file: PathBuf,
}

/// Output of data validation
///
/// `drift_detected` is serialized under the legacy report key
/// `validation_status`: true means the split distributions diverged, not that
/// the data is clean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataValidationArtifact {
    #[serde(rename = "validation_status")]
    pub drift_detected: bool,
    pub valid_training_file: PathBuf,
    pub valid_testing_file: PathBuf,
    pub invalid_training_file: Option<PathBuf>,
    pub invalid_testing_file: Option<PathBuf>,
    pub drift_report_file: PathBuf,
}

/// Output of data transformation: serialized feature arrays plus the fitted
/// preprocessing object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTransformationArtifact {
    pub transformed_training_file: PathBuf,
    pub transformed_testing_file: PathBuf,
    pub preprocessing_object_file: PathBuf,
}

/// Output of model training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTrainerArtifact {
    pub trained_model_file: PathBuf,
    pub train_metrics: ClassificationMetrics,
    pub test_metrics: ClassificationMetrics,
}

/// Output of the promotion decision
///
/// `improved_accuracy`, `best_model_file`, and `best_metrics` are `None` when
/// no deployed model existed to compare against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEvaluationArtifact {
    pub is_model_accepted: bool,
    pub improved_accuracy: Option<f64>,
    pub best_model_file: Option<PathBuf>,
    pub trained_model_file: PathBuf,
    pub trained_metrics: ClassificationMetrics,
    pub best_metrics: Option<ClassificationMetrics>,
}

/// Output of the model pusher: the run-scoped copy and the registry copy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPusherArtifact {
    pub model_file: PathBuf,
    pub saved_model_file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_artifact_serializes_legacy_field_name() {
        let artifact = DataValidationArtifact {
            drift_detected: true,
            valid_training_file: "valid/train.csv".into(),
            valid_testing_file: "valid/test.csv".into(),
            invalid_training_file: None,
            invalid_testing_file: None,
            drift_report_file: "drift_report/report.yaml".into(),
        };
        let yaml = serde_yaml::to_string(&artifact).unwrap();
        assert!(yaml.contains("validation_status: true"));
        assert!(!yaml.contains("drift_detected"));
    }

    #[test]
    fn test_evaluation_artifact_round_trip() {
        let artifact = ModelEvaluationArtifact {
            is_model_accepted: false,
            improved_accuracy: Some(0.01),
            best_model_file: Some("saved_models/10/model.json".into()),
            trained_model_file: "model_trainer/trained_model/model.json".into(),
            trained_metrics: ClassificationMetrics {
                f1_score: 0.76,
                precision_score: 0.8,
                recall_score: 0.72,
            },
            best_metrics: Some(ClassificationMetrics {
                f1_score: 0.75,
                precision_score: 0.78,
                recall_score: 0.73,
            }),
        };
        let yaml = serde_yaml::to_string(&artifact).unwrap();
        let back: ModelEvaluationArtifact = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, artifact);
    }
}
