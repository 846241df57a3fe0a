//! Model pusher stage
//!
//! Copies the accepted model into the run-scoped pusher directory and into a
//! fresh registry version keyed by Unix timestamp. Both copies must succeed;
//! there is no rollback if the second copy fails after the first.

use tracing::info;

use crate::artifact::{ModelEvaluationArtifact, ModelPusherArtifact};
use crate::config::ModelPusherConfig;
use crate::error::{Error, Result};

pub struct ModelPusher {
    config: ModelPusherConfig,
    evaluation: ModelEvaluationArtifact,
}

impl ModelPusher {
    pub fn new(config: ModelPusherConfig, evaluation: ModelEvaluationArtifact) -> Self {
        Self { config, evaluation }
    }

    pub fn run(self) -> Result<ModelPusherArtifact> {
        if !self.evaluation.is_model_accepted {
            return Err(Error::BadInput(
                "model was not accepted for promotion".into(),
            ));
        }

        info!("starting model push");
        let trained = &self.evaluation.trained_model_file;
        for destination in [&self.config.model_file, &self.config.saved_model_file] {
            if let Some(parent) = destination.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(trained, destination)?;
        }
        info!(
            registry = %self.config.saved_model_file.display(),
            "published model to registry"
        );

        Ok(ModelPusherArtifact {
            model_file: self.config.model_file,
            saved_model_file: self.config.saved_model_file,
        })
    }
}
