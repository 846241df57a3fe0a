//! # detectar
//!
//! Batch training pipeline for sensor fault detection.
//!
//! The pipeline pulls tabular sensor readings from a record store, validates
//! and cleans them, transforms features, trains a binary fault classifier,
//! compares it against the currently deployed best model, and promotes it
//! when it clears an improvement threshold. Each run writes its outputs under
//! an isolated `artifact/<timestamp>/` directory and hands immutable artifact
//! records from stage to stage.
//!
//! # Example
//!
//! ```no_run
//! use detectar::config::TrainingPipelineConfig;
//! use detectar::model::{NearestCentroid, StandardPreprocessor};
//! use detectar::pipeline::{RunLock, TrainingPipeline};
//! use detectar::store::CsvStore;
//! use detectar::sync::LocalMirror;
//!
//! let pipeline = TrainingPipeline::new(
//!     TrainingPipelineConfig::new("."),
//!     CsvStore::new("store"),
//!     StandardPreprocessor::new(),
//!     NearestCentroid::new(),
//!     LocalMirror::new("/mnt/bucket"),
//!     RunLock::new(),
//! );
//! let report = pipeline.run()?;
//! println!("accepted: {}", report.evaluation.is_model_accepted);
//! # Ok::<(), detectar::Error>(())
//! ```
//!
//! Feature engineering and classification sit behind the
//! [`model::FeatureTransformer`] and [`model::Classifier`] traits, so the
//! pipeline core stays independent of any concrete numerical library.

pub mod artifact;
pub mod cli;
pub mod config;
pub mod constants;
pub mod drift;
pub mod error;
pub mod frame;
pub mod labels;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod predict;
pub mod registry;
pub mod schema;
pub mod stages;
pub mod store;
pub mod sync;

pub use error::{Error, Result, StageKind};
pub use pipeline::{PipelineRunReport, RunLock, TrainingPipeline};
