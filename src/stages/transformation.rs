//! Data transformation stage
//!
//! Turns the validated splits into numeric training material: encodes the
//! target labels, fits the feature transformer on the training split only,
//! applies it to both splits, and persists the transformed arrays together
//! with the fitted preprocessing object.

use std::path::Path;

use ndarray::Array2;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::artifact::{DataTransformationArtifact, DataValidationArtifact};
use crate::config::DataTransformationConfig;
use crate::error::{Error, Result};
use crate::frame::DataFrame;
use crate::labels::encode_labels;
use crate::model::FeatureTransformer;
use crate::schema::DataSchema;

/// Transformed features and encoded targets for one split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedSet {
    pub features: Array2<f64>,
    pub targets: Vec<usize>,
}

impl TransformedSet {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }
}

pub struct DataTransformation<T> {
    config: DataTransformationConfig,
    validation: DataValidationArtifact,
    schema: DataSchema,
    transformer: T,
}

impl<T: FeatureTransformer + Serialize> DataTransformation<T> {
    pub fn new(
        config: DataTransformationConfig,
        validation: DataValidationArtifact,
        transformer: T,
    ) -> Result<Self> {
        let schema = DataSchema::from_yaml_file(&config.schema_file)?;
        Ok(Self {
            config,
            validation,
            schema,
            transformer,
        })
    }

    fn split_set(&self, frame: &DataFrame) -> Result<(Array2<f64>, Vec<usize>)> {
        let features = frame.feature_matrix(&self.schema.feature_columns())?;
        let labels = frame
            .categorical_column(self.schema.target_column())
            .ok_or_else(|| {
                Error::BadInput(format!(
                    "target column `{}` is missing or not categorical",
                    self.schema.target_column()
                ))
            })?;
        Ok((features, encode_labels(labels)?))
    }

    pub fn run(mut self) -> Result<DataTransformationArtifact> {
        info!("starting data transformation");
        let train = DataFrame::from_csv_path(&self.validation.valid_training_file)?;
        let test = DataFrame::from_csv_path(&self.validation.valid_testing_file)?;

        let (train_features, train_targets) = self.split_set(&train)?;
        let (test_features, test_targets) = self.split_set(&test)?;

        // fit on the training split only; the test split must stay unseen
        self.transformer.fit(&train_features)?;
        let train_transformed = self.transformer.transform(&train_features)?;
        let test_transformed = self.transformer.transform(&test_features)?;

        TransformedSet {
            features: train_transformed,
            targets: train_targets,
        }
        .save(&self.config.transformed_training_file)?;
        TransformedSet {
            features: test_transformed,
            targets: test_targets,
        }
        .save(&self.config.transformed_testing_file)?;

        let object_file = &self.config.preprocessing_object_file;
        if let Some(parent) = object_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(object_file, serde_json::to_string_pretty(&self.transformer)?)?;
        info!("data transformation completed");

        Ok(DataTransformationArtifact {
            transformed_training_file: self.config.transformed_training_file,
            transformed_testing_file: self.config.transformed_testing_file,
            preprocessing_object_file: self.config.preprocessing_object_file,
        })
    }
}

/// Load a preprocessing object persisted by the transformation stage
pub(crate) fn load_preprocessor<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
