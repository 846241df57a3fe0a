//! Training pipeline orchestration
//!
//! Runs the stages strictly in order, each consuming the previous artifact:
//! ingest, validate, transform, train, evaluate, and push when the evaluation
//! accepts the model. A rejected model still completes the run; promotion is
//! simply skipped. Any stage failure mirrors whatever artifacts exist to the
//! remote bucket, releases the run lock, and re-raises the wrapped error.
//!
//! Execution is single-threaded and blocking with no cancellation. The
//! [`RunLock`] is advisory: it rejects a second `run` on the same lock, but
//! callers coordinating several orchestrators must share one lock instance.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::artifact::{ModelEvaluationArtifact, ModelPusherArtifact};
use crate::config::{
    DataIngestionConfig, DataTransformationConfig, DataValidationConfig, ModelEvaluationConfig,
    ModelPusherConfig, ModelTrainerConfig, TrainingPipelineConfig,
};
use crate::error::{Error, Result, StageKind};
use crate::model::{Classifier, FeatureTransformer};
use crate::stages::{
    DataIngestion, DataTransformation, DataValidation, ModelEvaluation, ModelPusher, ModelTrainer,
};
use crate::store::RecordStore;
use crate::sync::SyncBackend;

/// Shared single-run flag, injected so tests can isolate orchestrators
#[derive(Debug, Clone, Default)]
pub struct RunLock {
    active: Arc<AtomicBool>,
}

impl RunLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a run holding this lock is currently active
    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Mark a run active; false when one already is
    pub fn try_acquire(&self) -> bool {
        self.active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Mark the run finished
    pub fn release(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct PipelineRunReport {
    pub timestamp: String,
    pub artifact_dir: PathBuf,
    pub evaluation: ModelEvaluationArtifact,
    /// `None` when the evaluation rejected the model and promotion was skipped
    pub pusher: Option<ModelPusherArtifact>,
}

/// Sequences the pipeline stages for one workspace
pub struct TrainingPipeline<S, T, C, B> {
    config: TrainingPipelineConfig,
    store: S,
    transformer: T,
    classifier: C,
    sync: B,
    lock: RunLock,
}

impl<S, T, C, B> TrainingPipeline<S, T, C, B>
where
    S: RecordStore,
    T: FeatureTransformer + Serialize + DeserializeOwned + Clone,
    C: Classifier + Serialize + DeserializeOwned + Clone,
    B: SyncBackend,
{
    /// The transformer and classifier are unfitted prototypes; each run fits
    /// fresh clones of them
    pub fn new(
        config: TrainingPipelineConfig,
        store: S,
        transformer: T,
        classifier: C,
        sync: B,
        lock: RunLock,
    ) -> Self {
        Self {
            config,
            store,
            transformer,
            classifier,
            sync,
            lock,
        }
    }

    pub fn config(&self) -> &TrainingPipelineConfig {
        &self.config
    }

    pub fn lock(&self) -> &RunLock {
        &self.lock
    }

    /// Execute one full run
    pub fn run(&self) -> Result<PipelineRunReport> {
        if !self.lock.try_acquire() {
            return Err(Error::Config("a training run is already active".into()));
        }
        info!(timestamp = %self.config.timestamp, "starting training pipeline run");

        let outcome = self.run_stages();
        let result = match outcome {
            Ok((evaluation, pusher)) => self
                .sync
                .mirror_dir(&self.config.artifact_dir, &self.config.artifact_bucket_key())
                .and_then(|()| {
                    self.sync.mirror_dir(
                        &self.config.saved_model_dir,
                        &self.config.registry_bucket_key(),
                    )
                })
                .map(|()| {
                    info!(timestamp = %self.config.timestamp, "training pipeline run completed");
                    PipelineRunReport {
                        timestamp: self.config.timestamp.clone(),
                        artifact_dir: self.config.artifact_dir.clone(),
                        evaluation,
                        pusher,
                    }
                }),
            Err(err) => {
                // mirror whatever the failed run managed to produce
                if let Err(sync_err) = self
                    .sync
                    .mirror_dir(&self.config.artifact_dir, &self.config.artifact_bucket_key())
                {
                    warn!(error = %sync_err, "could not mirror partial artifacts after failure");
                }
                Err(err)
            }
        };

        self.lock.release();
        result
    }

    fn run_stages(&self) -> Result<(ModelEvaluationArtifact, Option<ModelPusherArtifact>)> {
        let ingestion = DataIngestion::new(
            DataIngestionConfig::for_pipeline(&self.config),
            &self.store,
        )
        .and_then(DataIngestion::run)
        .map_err(|e| e.in_stage(StageKind::DataIngestion))?;

        let validation = DataValidation::new(
            DataValidationConfig::for_pipeline(&self.config),
            ingestion,
        )
        .and_then(DataValidation::run)
        .map_err(|e| e.in_stage(StageKind::DataValidation))?;

        let transformation = DataTransformation::new(
            DataTransformationConfig::for_pipeline(&self.config),
            validation.clone(),
            self.transformer.clone(),
        )
        .and_then(DataTransformation::run)
        .map_err(|e| e.in_stage(StageKind::DataTransformation))?;

        let trainer = ModelTrainer::<T, C>::new(
            ModelTrainerConfig::for_pipeline(&self.config),
            transformation,
            self.classifier.clone(),
        )
        .run()
        .map_err(|e| e.in_stage(StageKind::ModelTrainer))?;

        let evaluation = ModelEvaluation::<T, C>::new(
            ModelEvaluationConfig::for_pipeline(&self.config),
            validation,
            trainer,
        )
        .and_then(ModelEvaluation::run)
        .map_err(|e| e.in_stage(StageKind::ModelEvaluation))?;

        if !evaluation.is_model_accepted {
            info!("trained model did not clear the improvement threshold, promotion skipped");
            return Ok((evaluation, None));
        }

        let pusher = ModelPusher::new(
            ModelPusherConfig::for_pipeline(&self.config),
            evaluation.clone(),
        )
        .run()
        .map_err(|e| e.in_stage(StageKind::ModelPusher))?;

        Ok((evaluation, Some(pusher)))
    }
}
