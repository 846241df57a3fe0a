//! Crate-wide error types
//!
//! Every pipeline stage catches its own failures and re-raises them wrapped in
//! [`Error::Stage`] so the orchestrator and callers always see which stage
//! broke and why. There are no retries anywhere: a failed run is restarted as
//! a fresh timestamped run, never resumed.

use std::fmt;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stages, used to tag wrapped stage failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    DataIngestion,
    DataValidation,
    DataTransformation,
    ModelTrainer,
    ModelEvaluation,
    ModelPusher,
}

impl StageKind {
    /// Directory-style name of this stage
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::DataIngestion => "data_ingestion",
            StageKind::DataValidation => "data_validation",
            StageKind::DataTransformation => "data_transformation",
            StageKind::ModelTrainer => "model_trainer",
            StageKind::ModelEvaluation => "model_evaluation",
            StageKind::ModelPusher => "model_pusher",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur across the training pipeline and serving core
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed schema or path configuration
    #[error("config error: {0}")]
    Config(String),

    /// Aggregated structural validation failures; one line per failed check
    #[error("validation failed:\n{0}")]
    Validation(String),

    /// A stage failed; carries the stage name and the underlying cause
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: StageKind,
        #[source]
        source: Box<Error>,
    },

    /// Record store access failure
    #[error("store error: {0}")]
    Store(String),

    /// Failure inside a model seam (unfitted estimator, shape mismatch)
    #[error("model error: {0}")]
    Model(String),

    /// No deployed model where one is required
    #[error("no model available: {0}")]
    MissingModel(String),

    /// Malformed caller input (empty frame, missing required columns)
    #[error("bad input: {0}")]
    BadInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap this error with the stage it occurred in
    pub fn in_stage(self, stage: StageKind) -> Error {
        Error::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// The stage this error was raised in, if it is a stage failure
    pub fn stage(&self) -> Option<StageKind> {
        match self {
            Error::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
