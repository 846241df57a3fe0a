//! Pipeline-wide constants
//!
//! Directory names, file names, and decision thresholds shared by the stage
//! configs. All artifact paths are derived from these plus the run timestamp,
//! so every run writes under its own `artifact/<timestamp>/` root.

/// Name the pipeline publishes artifacts under
pub const PIPELINE_NAME: &str = "sensor";

/// Root directory for per-run artifacts
pub const ARTIFACT_DIR: &str = "artifact";

/// Raw export of the source collection
pub const FEATURE_STORE_FILE: &str = "sensor.csv";

pub const TRAIN_FILE: &str = "train.csv";
pub const TEST_FILE: &str = "test.csv";

/// Serialized fitted preprocessing object
pub const PREPROCESSING_OBJECT_FILE: &str = "preprocessing.json";

/// Serialized model bundle (preprocessor + classifier)
pub const MODEL_FILE: &str = "model.json";

/// Schema config location, relative to the workspace root
pub const SCHEMA_FILE: &str = "config/schema.yaml";

/// Versioned registry of deployed models; subdirectory names are Unix
/// timestamps and the numerically largest one is the current best model
pub const SAVED_MODEL_DIR: &str = "saved_models";

/// CSV token treated as a missing value
pub const MISSING_TOKEN: &str = "na";

// data ingestion

pub const DATA_INGESTION_DIR: &str = "data_ingestion";
pub const DATA_INGESTION_FEATURE_STORE_DIR: &str = "feature_store";
pub const DATA_INGESTION_INGESTED_DIR: &str = "ingested";
pub const DATA_INGESTION_COLLECTION: &str = "sensor";
pub const TRAIN_TEST_SPLIT_RATIO: f64 = 0.2;
pub const SPLIT_SEED: u64 = 42;

// data validation

pub const DATA_VALIDATION_DIR: &str = "data_validation";
pub const DATA_VALIDATION_VALID_DIR: &str = "valid";
pub const DATA_VALIDATION_INVALID_DIR: &str = "invalid";
pub const DRIFT_REPORT_DIR: &str = "drift_report";
pub const DRIFT_REPORT_FILE: &str = "report.yaml";

/// A column drifts when its two-sample test p-value falls below this
pub const DRIFT_P_VALUE_THRESHOLD: f64 = 0.05;

// data transformation

pub const DATA_TRANSFORMATION_DIR: &str = "data_transformation";
pub const TRANSFORMED_DATA_DIR: &str = "transformed_data";
pub const TRANSFORMED_OBJECT_DIR: &str = "transformed_object";
pub const TRANSFORMED_TRAIN_FILE: &str = "train.json";
pub const TRANSFORMED_TEST_FILE: &str = "test.json";

// model trainer

pub const MODEL_TRAINER_DIR: &str = "model_trainer";
pub const TRAINED_MODEL_DIR: &str = "trained_model";

/// Minimum acceptable F1 on the training split
pub const MODEL_TRAINER_EXPECTED_SCORE: f64 = 0.6;

/// Maximum tolerated |train F1 - test F1| gap
pub const MODEL_TRAINER_OVERFIT_THRESHOLD: f64 = 0.05;

// model evaluation

pub const MODEL_EVALUATION_DIR: &str = "model_evaluation";
pub const MODEL_EVALUATION_REPORT_FILE: &str = "report.yaml";

/// Minimum F1 improvement over the deployed model required for promotion.
/// A strict improvement bar, not zero, so promotion does not flap on noise.
pub const MODEL_EVALUATION_CHANGED_THRESHOLD: f64 = 0.02;

// model pusher

pub const MODEL_PUSHER_DIR: &str = "model_pusher";

/// Column appended to inference output with the decoded predicted label
pub const PREDICTED_COLUMN: &str = "predicted_class";
