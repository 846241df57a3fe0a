//! Run and stage configuration
//!
//! A run is identified by one timestamp; every stage derives its output paths
//! from the run's `artifact/<timestamp>/` root plus the crate constants, so
//! two runs can never write into each other's directories. Stage configs are
//! plain value objects computed once and never mutated.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::constants::{
    ARTIFACT_DIR, DATA_INGESTION_COLLECTION, DATA_INGESTION_DIR,
    DATA_INGESTION_FEATURE_STORE_DIR, DATA_INGESTION_INGESTED_DIR, DATA_TRANSFORMATION_DIR,
    DATA_VALIDATION_DIR, DATA_VALIDATION_INVALID_DIR, DATA_VALIDATION_VALID_DIR,
    DRIFT_P_VALUE_THRESHOLD, DRIFT_REPORT_DIR, DRIFT_REPORT_FILE, FEATURE_STORE_FILE,
    MODEL_EVALUATION_CHANGED_THRESHOLD, MODEL_EVALUATION_DIR, MODEL_EVALUATION_REPORT_FILE,
    MODEL_FILE, MODEL_PUSHER_DIR, MODEL_TRAINER_DIR, MODEL_TRAINER_EXPECTED_SCORE,
    MODEL_TRAINER_OVERFIT_THRESHOLD, PIPELINE_NAME, PREPROCESSING_OBJECT_FILE, SAVED_MODEL_DIR,
    SCHEMA_FILE, SPLIT_SEED, TEST_FILE, TRAINED_MODEL_DIR, TRAIN_FILE, TRAIN_TEST_SPLIT_RATIO,
    TRANSFORMED_DATA_DIR, TRANSFORMED_OBJECT_DIR, TRANSFORMED_TEST_FILE, TRANSFORMED_TRAIN_FILE,
};

/// Timestamp format used for run directories
const RUN_TIMESTAMP_FORMAT: &str = "%m_%d_%Y_%H_%M_%S";

/// Identity and root paths of a single pipeline run
#[derive(Debug, Clone)]
pub struct TrainingPipelineConfig {
    pub pipeline_name: String,
    pub timestamp: String,
    pub artifact_dir: PathBuf,
    pub saved_model_dir: PathBuf,
    pub schema_file: PathBuf,
}

impl TrainingPipelineConfig {
    /// Config for a run starting now
    pub fn new(workspace_root: impl AsRef<Path>) -> Self {
        Self::at(workspace_root, Utc::now())
    }

    /// Config for a run pinned to a given instant (tests pin this to keep
    /// artifact directories distinct and reproducible)
    pub fn at(workspace_root: impl AsRef<Path>, instant: DateTime<Utc>) -> Self {
        let root = workspace_root.as_ref();
        let timestamp = instant.format(RUN_TIMESTAMP_FORMAT).to_string();
        Self {
            pipeline_name: PIPELINE_NAME.to_string(),
            artifact_dir: root.join(ARTIFACT_DIR).join(&timestamp),
            saved_model_dir: root.join(SAVED_MODEL_DIR),
            schema_file: root.join(SCHEMA_FILE),
            timestamp,
        }
    }

    /// Bucket key the run's artifacts are mirrored under
    pub fn artifact_bucket_key(&self) -> String {
        format!("{}/{}/{}", self.pipeline_name, self.timestamp, ARTIFACT_DIR)
    }

    /// Bucket key the model registry is mirrored under
    pub fn registry_bucket_key(&self) -> String {
        format!("{}/{}", self.pipeline_name, SAVED_MODEL_DIR)
    }
}

#[derive(Debug, Clone)]
pub struct DataIngestionConfig {
    pub feature_store_file: PathBuf,
    pub training_file: PathBuf,
    pub testing_file: PathBuf,
    pub collection: String,
    pub split_ratio: f64,
    pub split_seed: u64,
    pub schema_file: PathBuf,
}

impl DataIngestionConfig {
    pub fn for_pipeline(pipeline: &TrainingPipelineConfig) -> Self {
        let stage_dir = pipeline.artifact_dir.join(DATA_INGESTION_DIR);
        let ingested = stage_dir.join(DATA_INGESTION_INGESTED_DIR);
        Self {
            feature_store_file: stage_dir
                .join(DATA_INGESTION_FEATURE_STORE_DIR)
                .join(FEATURE_STORE_FILE),
            training_file: ingested.join(TRAIN_FILE),
            testing_file: ingested.join(TEST_FILE),
            collection: DATA_INGESTION_COLLECTION.to_string(),
            split_ratio: TRAIN_TEST_SPLIT_RATIO,
            split_seed: SPLIT_SEED,
            schema_file: pipeline.schema_file.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DataValidationConfig {
    pub valid_training_file: PathBuf,
    pub valid_testing_file: PathBuf,
    pub invalid_training_file: PathBuf,
    pub invalid_testing_file: PathBuf,
    pub drift_report_file: PathBuf,
    pub drift_threshold: f64,
    pub schema_file: PathBuf,
}

impl DataValidationConfig {
    pub fn for_pipeline(pipeline: &TrainingPipelineConfig) -> Self {
        let stage_dir = pipeline.artifact_dir.join(DATA_VALIDATION_DIR);
        let valid = stage_dir.join(DATA_VALIDATION_VALID_DIR);
        let invalid = stage_dir.join(DATA_VALIDATION_INVALID_DIR);
        Self {
            valid_training_file: valid.join(TRAIN_FILE),
            valid_testing_file: valid.join(TEST_FILE),
            invalid_training_file: invalid.join(TRAIN_FILE),
            invalid_testing_file: invalid.join(TEST_FILE),
            drift_report_file: stage_dir.join(DRIFT_REPORT_DIR).join(DRIFT_REPORT_FILE),
            drift_threshold: DRIFT_P_VALUE_THRESHOLD,
            schema_file: pipeline.schema_file.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DataTransformationConfig {
    pub transformed_training_file: PathBuf,
    pub transformed_testing_file: PathBuf,
    pub preprocessing_object_file: PathBuf,
    pub schema_file: PathBuf,
}

impl DataTransformationConfig {
    pub fn for_pipeline(pipeline: &TrainingPipelineConfig) -> Self {
        let stage_dir = pipeline.artifact_dir.join(DATA_TRANSFORMATION_DIR);
        let data = stage_dir.join(TRANSFORMED_DATA_DIR);
        Self {
            transformed_training_file: data.join(TRANSFORMED_TRAIN_FILE),
            transformed_testing_file: data.join(TRANSFORMED_TEST_FILE),
            preprocessing_object_file: stage_dir
                .join(TRANSFORMED_OBJECT_DIR)
                .join(PREPROCESSING_OBJECT_FILE),
            schema_file: pipeline.schema_file.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelTrainerConfig {
    pub trained_model_file: PathBuf,
    pub expected_score: f64,
    pub overfit_underfit_threshold: f64,
}

impl ModelTrainerConfig {
    pub fn for_pipeline(pipeline: &TrainingPipelineConfig) -> Self {
        Self {
            trained_model_file: pipeline
                .artifact_dir
                .join(MODEL_TRAINER_DIR)
                .join(TRAINED_MODEL_DIR)
                .join(MODEL_FILE),
            expected_score: MODEL_TRAINER_EXPECTED_SCORE,
            overfit_underfit_threshold: MODEL_TRAINER_OVERFIT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelEvaluationConfig {
    pub report_file: PathBuf,
    pub changed_threshold: f64,
    pub saved_model_dir: PathBuf,
    pub schema_file: PathBuf,
}

impl ModelEvaluationConfig {
    pub fn for_pipeline(pipeline: &TrainingPipelineConfig) -> Self {
        Self {
            report_file: pipeline
                .artifact_dir
                .join(MODEL_EVALUATION_DIR)
                .join(MODEL_EVALUATION_REPORT_FILE),
            changed_threshold: MODEL_EVALUATION_CHANGED_THRESHOLD,
            saved_model_dir: pipeline.saved_model_dir.clone(),
            schema_file: pipeline.schema_file.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelPusherConfig {
    pub model_file: PathBuf,
    pub saved_model_file: PathBuf,
}

impl ModelPusherConfig {
    /// Registry version taken from the wall clock at construction time
    pub fn for_pipeline(pipeline: &TrainingPipelineConfig) -> Self {
        Self::with_version(pipeline, Utc::now().timestamp().unsigned_abs())
    }

    /// Registry version pinned explicitly (used by tests)
    pub fn with_version(pipeline: &TrainingPipelineConfig, version: u64) -> Self {
        Self {
            model_file: pipeline
                .artifact_dir
                .join(MODEL_PUSHER_DIR)
                .join(MODEL_FILE),
            saved_model_file: pipeline
                .saved_model_dir
                .join(version.to_string())
                .join(MODEL_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pinned_pipeline() -> TrainingPipelineConfig {
        let instant = Utc.with_ymd_and_hms(2026, 6, 1, 10, 30, 0).unwrap();
        TrainingPipelineConfig::at("/work", instant)
    }

    #[test]
    fn test_timestamp_format() {
        let pipeline = pinned_pipeline();
        assert_eq!(pipeline.timestamp, "06_01_2026_10_30_00");
        assert_eq!(
            pipeline.artifact_dir,
            PathBuf::from("/work/artifact/06_01_2026_10_30_00")
        );
    }

    #[test]
    fn test_stage_paths_nest_under_artifact_dir() {
        let pipeline = pinned_pipeline();
        let ingestion = DataIngestionConfig::for_pipeline(&pipeline);
        let validation = DataValidationConfig::for_pipeline(&pipeline);
        let transformation = DataTransformationConfig::for_pipeline(&pipeline);
        let trainer = ModelTrainerConfig::for_pipeline(&pipeline);
        let evaluation = ModelEvaluationConfig::for_pipeline(&pipeline);

        for path in [
            &ingestion.feature_store_file,
            &ingestion.training_file,
            &validation.valid_training_file,
            &validation.drift_report_file,
            &transformation.transformed_training_file,
            &transformation.preprocessing_object_file,
            &trainer.trained_model_file,
            &evaluation.report_file,
        ] {
            assert!(
                path.starts_with(&pipeline.artifact_dir),
                "{} escapes the run directory",
                path.display()
            );
        }
    }

    #[test]
    fn test_distinct_timestamps_isolate_runs() {
        let first = TrainingPipelineConfig::at(
            "/work",
            Utc.with_ymd_and_hms(2026, 6, 1, 10, 30, 0).unwrap(),
        );
        let second = TrainingPipelineConfig::at(
            "/work",
            Utc.with_ymd_and_hms(2026, 6, 1, 10, 30, 1).unwrap(),
        );
        assert_ne!(first.artifact_dir, second.artifact_dir);
    }

    #[test]
    fn test_pusher_registry_path_is_versioned() {
        let pipeline = pinned_pipeline();
        let pusher = ModelPusherConfig::with_version(&pipeline, 1_770_000_000);
        assert_eq!(
            pusher.saved_model_file,
            PathBuf::from("/work/saved_models/1770000000/model.json")
        );
    }

    #[test]
    fn test_bucket_keys() {
        let pipeline = pinned_pipeline();
        assert_eq!(
            pipeline.artifact_bucket_key(),
            "sensor/06_01_2026_10_30_00/artifact"
        );
        assert_eq!(pipeline.registry_bucket_key(), "sensor/saved_models");
    }
}
