//! Model trainer stage
//!
//! Fits the classifier on the transformed training split, scores both splits,
//! and rejects fits that miss the expected score or show a train/test gap
//! beyond the over/underfit threshold. The accepted classifier is bundled
//! with the fitted preprocessing object into the deployable model file.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use super::transformation::{load_preprocessor, TransformedSet};
use crate::artifact::{DataTransformationArtifact, ModelTrainerArtifact};
use crate::config::ModelTrainerConfig;
use crate::error::{Error, Result};
use crate::metrics::ClassificationMetrics;
use crate::model::{Classifier, FeatureTransformer, SensorModel};

pub struct ModelTrainer<T, C> {
    config: ModelTrainerConfig,
    transformation: DataTransformationArtifact,
    classifier: C,
    _preprocessor: PhantomData<T>,
}

impl<T, C> ModelTrainer<T, C>
where
    T: FeatureTransformer + Serialize + DeserializeOwned,
    C: Classifier + Serialize,
{
    pub fn new(
        config: ModelTrainerConfig,
        transformation: DataTransformationArtifact,
        classifier: C,
    ) -> Self {
        Self {
            config,
            transformation,
            classifier,
            _preprocessor: PhantomData,
        }
    }

    pub fn run(mut self) -> Result<ModelTrainerArtifact> {
        info!("starting model training");
        let train = TransformedSet::load(&self.transformation.transformed_training_file)?;
        let test = TransformedSet::load(&self.transformation.transformed_testing_file)?;

        self.classifier.fit(&train.features, &train.targets)?;

        let train_predictions = self.classifier.predict(&train.features)?;
        let test_predictions = self.classifier.predict(&test.features)?;
        let train_metrics =
            ClassificationMetrics::from_predictions(&train.targets, &train_predictions)?;
        let test_metrics =
            ClassificationMetrics::from_predictions(&test.targets, &test_predictions)?;
        info!(
            train_f1 = train_metrics.f1_score,
            test_f1 = test_metrics.f1_score,
            "scored trained model"
        );

        if train_metrics.f1_score < self.config.expected_score {
            return Err(Error::Model(format!(
                "trained model f1 {:.4} is below the expected score {:.4}",
                train_metrics.f1_score, self.config.expected_score
            )));
        }
        let gap = (train_metrics.f1_score - test_metrics.f1_score).abs();
        if gap > self.config.overfit_underfit_threshold {
            return Err(Error::Model(format!(
                "train/test f1 gap {:.4} exceeds the over/underfit threshold {:.4}",
                gap, self.config.overfit_underfit_threshold
            )));
        }

        let preprocessor: T =
            load_preprocessor(&self.transformation.preprocessing_object_file)?;
        let model = SensorModel::new(preprocessor, self.classifier);
        model.save(&self.config.trained_model_file)?;
        info!(model = %self.config.trained_model_file.display(), "persisted trained model");

        Ok(ModelTrainerArtifact {
            trained_model_file: self.config.trained_model_file,
            train_metrics,
            test_metrics,
        })
    }
}
