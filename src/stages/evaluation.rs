//! Model evaluation stage
//!
//! Decides whether the freshly trained model replaces the deployed best
//! model. With no deployed model the trained one is accepted unconditionally.
//! Otherwise both models score the combined validation set and the trained
//! model must beat the best model's F1 by more than the configured threshold.
//! Rejection is a valid outcome, not a failure; only load or predict errors
//! fail the stage.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::artifact::{DataValidationArtifact, ModelEvaluationArtifact, ModelTrainerArtifact};
use crate::config::ModelEvaluationConfig;
use crate::error::{Error, Result};
use crate::frame::DataFrame;
use crate::labels::encode_labels;
use crate::metrics::ClassificationMetrics;
use crate::model::{Classifier, FeatureTransformer, SensorModel};
use crate::registry::ModelResolver;
use crate::schema::DataSchema;

/// F1 delta between the trained and best models, and whether it clears the
/// promotion bar. The bar is a strict improvement threshold, not zero.
pub fn promotion_decision(
    trained: &ClassificationMetrics,
    best: &ClassificationMetrics,
    changed_threshold: f64,
) -> (f64, bool) {
    let improved_accuracy = trained.f1_score - best.f1_score;
    (improved_accuracy, improved_accuracy > changed_threshold)
}

pub struct ModelEvaluation<T, C> {
    config: ModelEvaluationConfig,
    validation: DataValidationArtifact,
    trainer: ModelTrainerArtifact,
    schema: DataSchema,
    resolver: ModelResolver,
    _marker: PhantomData<(T, C)>,
}

impl<T, C> ModelEvaluation<T, C>
where
    T: FeatureTransformer + DeserializeOwned,
    C: Classifier + DeserializeOwned,
{
    pub fn new(
        config: ModelEvaluationConfig,
        validation: DataValidationArtifact,
        trainer: ModelTrainerArtifact,
    ) -> Result<Self> {
        let schema = DataSchema::from_yaml_file(&config.schema_file)?;
        let resolver = ModelResolver::new(config.saved_model_dir.clone());
        Ok(Self {
            config,
            validation,
            trainer,
            schema,
            resolver,
            _marker: PhantomData,
        })
    }

    fn write_report(&self, artifact: &ModelEvaluationArtifact) -> Result<()> {
        let path = &self.config.report_file;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(artifact)?)?;
        Ok(())
    }

    pub fn run(self) -> Result<ModelEvaluationArtifact> {
        info!("starting model evaluation");
        let train = DataFrame::from_csv_path(&self.validation.valid_training_file)?;
        let test = DataFrame::from_csv_path(&self.validation.valid_testing_file)?;
        let combined = train.concat(&test)?;

        let labels = combined
            .categorical_column(self.schema.target_column())
            .ok_or_else(|| {
                Error::BadInput(format!(
                    "target column `{}` is missing or not categorical",
                    self.schema.target_column()
                ))
            })?;
        let y_true = encode_labels(labels)?;
        let features = combined.feature_matrix(&self.schema.feature_columns())?;

        if !self.resolver.best_model_exists() {
            info!("no deployed model found, accepting trained model unconditionally");
            let artifact = ModelEvaluationArtifact {
                is_model_accepted: true,
                improved_accuracy: None,
                best_model_file: None,
                trained_model_file: self.trainer.trained_model_file.clone(),
                trained_metrics: self.trainer.train_metrics,
                best_metrics: None,
            };
            self.write_report(&artifact)?;
            return Ok(artifact);
        }

        let best_model_file = self.resolver.latest_model_path()?;
        let best: SensorModel<T, C> = SensorModel::load(&best_model_file)?;
        let trained: SensorModel<T, C> = SensorModel::load(&self.trainer.trained_model_file)?;

        let trained_predictions = trained.predict(&features)?;
        let best_predictions = best.predict(&features)?;
        let trained_metrics =
            ClassificationMetrics::from_predictions(&y_true, &trained_predictions)?;
        let best_metrics = ClassificationMetrics::from_predictions(&y_true, &best_predictions)?;

        let (improved_accuracy, is_model_accepted) =
            promotion_decision(&trained_metrics, &best_metrics, self.config.changed_threshold);
        info!(
            improved_accuracy,
            threshold = self.config.changed_threshold,
            is_model_accepted,
            "model evaluation completed"
        );

        let artifact = ModelEvaluationArtifact {
            is_model_accepted,
            improved_accuracy: Some(improved_accuracy),
            best_model_file: Some(best_model_file),
            trained_model_file: self.trainer.trained_model_file.clone(),
            trained_metrics,
            best_metrics: Some(best_metrics),
        };
        self.write_report(&artifact)?;
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainingPipelineConfig;
    use crate::constants::MODEL_FILE;
    use crate::frame::Column;
    use crate::model::{NearestCentroid, StandardPreprocessor};
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

    /// Labels follow sensor_01: values above 5 are `pos`
    fn validation_frame(rows: usize) -> DataFrame {
        let mut frame = DataFrame::new();
        let labels = (0..rows)
            .map(|i| if i % 2 == 0 { "neg".into() } else { "pos".into() })
            .collect();
        let s1 = (0..rows)
            .map(|i| if i % 2 == 0 { 0.0 + i as f64 * 1e-3 } else { 10.0 })
            .collect();
        let s2 = (0..rows)
            .map(|i| if i % 2 == 0 { 1.0 } else { -9.0 })
            .collect();
        frame.push_column("class", Column::Categorical(labels)).unwrap();
        frame.push_column("sensor_01", Column::Numeric(s1)).unwrap();
        frame.push_column("sensor_02", Column::Numeric(s2)).unwrap();
        frame
    }

    fn fitted_model(rows: usize) -> SensorModel<StandardPreprocessor, NearestCentroid> {
        let frame = validation_frame(rows);
        let features = frame.feature_matrix(&["sensor_01", "sensor_02"]).unwrap();
        let labels = frame.categorical_column("class").unwrap();
        let targets = encode_labels(labels).unwrap();

        let mut preprocessor = StandardPreprocessor::new();
        preprocessor.fit(&features).unwrap();
        let transformed = preprocessor.transform(&features).unwrap();
        let mut classifier = NearestCentroid::new();
        classifier.fit(&transformed, &targets).unwrap();
        SensorModel::new(preprocessor, classifier)
    }

    fn setup(
        root: &Path,
    ) -> (
        ModelEvaluationConfig,
        DataValidationArtifact,
        ModelTrainerArtifact,
        TrainingPipelineConfig,
    ) {
        let pipeline = TrainingPipelineConfig::at(
            root,
            Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap(),
        );
        std::fs::create_dir_all(pipeline.schema_file.parent().unwrap()).unwrap();
        std::fs::write(&pipeline.schema_file, SCHEMA_YAML).unwrap();

        let config = ModelEvaluationConfig::for_pipeline(&pipeline);
        let valid_dir = pipeline.artifact_dir.join("data_validation").join("valid");
        let validation = DataValidationArtifact {
            drift_detected: false,
            valid_training_file: valid_dir.join("train.csv"),
            valid_testing_file: valid_dir.join("test.csv"),
            invalid_training_file: None,
            invalid_testing_file: None,
            drift_report_file: pipeline
                .artifact_dir
                .join("data_validation/drift_report/report.yaml"),
        };
        validation_frame(20)
            .to_csv_path(&validation.valid_training_file)
            .unwrap();
        validation_frame(8)
            .to_csv_path(&validation.valid_testing_file)
            .unwrap();

        let trained_model_file = pipeline
            .artifact_dir
            .join("model_trainer/trained_model")
            .join(MODEL_FILE);
        fitted_model(20).save(&trained_model_file).unwrap();
        let metrics = ClassificationMetrics {
            f1_score: 1.0,
            precision_score: 1.0,
            recall_score: 1.0,
        };
        let trainer = ModelTrainerArtifact {
            trained_model_file,
            train_metrics: metrics,
            test_metrics: metrics,
        };

        (config, validation, trainer, pipeline)
    }

    fn metrics_with_f1(f1: f64) -> ClassificationMetrics {
        ClassificationMetrics {
            f1_score: f1,
            precision_score: f1,
            recall_score: f1,
        }
    }

    #[test]
    fn test_promotion_decision_clears_threshold() {
        let (improved, accepted) =
            promotion_decision(&metrics_with_f1(0.80), &metrics_with_f1(0.75), 0.02);
        assert!((improved - 0.05).abs() < 1e-12);
        assert!(accepted);
    }

    #[test]
    fn test_promotion_decision_misses_threshold() {
        let (improved, accepted) =
            promotion_decision(&metrics_with_f1(0.76), &metrics_with_f1(0.75), 0.02);
        assert!((improved - 0.01).abs() < 1e-12);
        assert!(!accepted);
    }

    #[test]
    fn test_promotion_decision_threshold_is_strict() {
        // an improvement exactly on the bar does not promote
        let (improved, accepted) =
            promotion_decision(&metrics_with_f1(1.0), &metrics_with_f1(0.75), 0.25);
        assert_eq!(improved, 0.25);
        assert!(!accepted);
    }

    #[test]
    fn test_no_best_model_accepts_unconditionally() {
        let dir = tempdir().unwrap();
        let (config, validation, trainer, _) = setup(dir.path());
        let report_file = config.report_file.clone();

        let artifact = ModelEvaluation::<StandardPreprocessor, NearestCentroid>::new(
            config, validation, trainer,
        )
        .unwrap()
        .run()
        .unwrap();

        assert!(artifact.is_model_accepted);
        assert!(artifact.improved_accuracy.is_none());
        assert!(artifact.best_model_file.is_none());
        assert!(artifact.best_metrics.is_none());
        assert!(report_file.exists());
    }

    #[test]
    fn test_equal_best_model_is_rejected_by_threshold() {
        let dir = tempdir().unwrap();
        let (config, validation, trainer, pipeline) = setup(dir.path());

        // deploy an identical model: improvement 0.0 is not > 0.02
        fitted_model(20)
            .save(pipeline.saved_model_dir.join("100").join(MODEL_FILE))
            .unwrap();

        let artifact = ModelEvaluation::<StandardPreprocessor, NearestCentroid>::new(
            config, validation, trainer,
        )
        .unwrap()
        .run()
        .unwrap();

        assert!(!artifact.is_model_accepted);
        assert_eq!(artifact.improved_accuracy, Some(0.0));
        assert!(artifact.best_model_file.is_some());
    }

    #[test]
    fn test_weak_best_model_is_beaten() {
        let dir = tempdir().unwrap();
        let (config, validation, trainer, pipeline) = setup(dir.path());

        // deployed model only ever saw the negative class, so it scores f1 = 0
        let mut weak = fitted_model(20);
        let features = validation_frame(20)
            .feature_matrix(&["sensor_01", "sensor_02"])
            .unwrap();
        let transformed = weak.preprocessor.transform(&features).unwrap();
        let mut classifier = NearestCentroid::new();
        classifier.fit(&transformed, &vec![0; 20]).unwrap();
        weak.classifier = classifier;
        weak.save(pipeline.saved_model_dir.join("100").join(MODEL_FILE))
            .unwrap();

        let artifact = ModelEvaluation::<StandardPreprocessor, NearestCentroid>::new(
            config, validation, trainer,
        )
        .unwrap()
        .run()
        .unwrap();

        assert!(artifact.is_model_accepted);
        let improved = artifact.improved_accuracy.unwrap();
        assert!(improved > 0.02, "improvement {improved} should clear the bar");
    }

    #[test]
    fn test_picks_numerically_latest_registry_version() {
        let dir = tempdir().unwrap();
        let (config, validation, trainer, pipeline) = setup(dir.path());

        for version in ["3", "10", "2"] {
            fitted_model(20)
                .save(pipeline.saved_model_dir.join(version).join(MODEL_FILE))
                .unwrap();
        }

        let artifact = ModelEvaluation::<StandardPreprocessor, NearestCentroid>::new(
            config, validation, trainer,
        )
        .unwrap()
        .run()
        .unwrap();

        let best = artifact.best_model_file.unwrap();
        assert!(best.ends_with(Path::new("10").join(MODEL_FILE)));
    }
}
