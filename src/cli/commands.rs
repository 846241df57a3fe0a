//! CLI command implementations

use std::path::Path;

use super::{PredictArgs, TrainArgs};
use crate::config::TrainingPipelineConfig;
use crate::constants::SAVED_MODEL_DIR;
use crate::error::Result;
use crate::model::{NearestCentroid, StandardPreprocessor};
use crate::pipeline::{RunLock, TrainingPipeline};
use crate::predict::Predictor;
use crate::registry::ModelResolver;
use crate::store::CsvStore;
use crate::sync::{LocalMirror, NoopSync, SyncBackend};

pub(crate) fn run_train(root: &Path, args: TrainArgs) -> Result<()> {
    let store = CsvStore::new(args.store.unwrap_or_else(|| root.join("store")));
    let sync: Box<dyn SyncBackend> = match args.mirror {
        Some(bucket) => Box::new(LocalMirror::new(bucket)),
        None => Box::new(NoopSync),
    };

    let pipeline = TrainingPipeline::new(
        TrainingPipelineConfig::new(root),
        store,
        StandardPreprocessor::new(),
        NearestCentroid::new(),
        sync,
        RunLock::new(),
    );
    let report = pipeline.run()?;

    println!("run {} completed", report.timestamp);
    println!("artifacts: {}", report.artifact_dir.display());
    match (&report.pusher, report.evaluation.improved_accuracy) {
        (Some(pusher), improved) => {
            if let Some(improved) = improved {
                println!("model accepted (f1 improvement {improved:.4})");
            } else {
                println!("model accepted (no previous model to compare against)");
            }
            println!("published: {}", pusher.saved_model_file.display());
        }
        (None, improved) => {
            let improved = improved.unwrap_or_default();
            println!("model rejected (f1 improvement {improved:.4}), promotion skipped");
        }
    }
    Ok(())
}

pub(crate) fn run_predict(root: &Path, args: &PredictArgs) -> Result<()> {
    let predictor = Predictor::<StandardPreprocessor, NearestCentroid>::from_workspace(root)?;
    let scored = predictor.predict_csv(&args.input, &args.output)?;
    println!(
        "scored {} rows into {}",
        scored.n_rows(),
        args.output.display()
    );
    Ok(())
}

pub(crate) fn run_info(root: &Path) -> Result<()> {
    let resolver = ModelResolver::new(root.join(SAVED_MODEL_DIR));
    match resolver.latest_version() {
        Some(version) => {
            println!("latest model version: {version}");
            println!("model file: {}", resolver.latest_model_path()?.display());
        }
        None => println!("no deployed model"),
    }
    Ok(())
}
