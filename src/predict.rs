//! Batch inference over tabular input
//!
//! Loads the latest deployed model from the registry and scores uploaded
//! tabular data. Input must carry every schema-derived feature column and at
//! least one row; the output is the input with a predicted-label column
//! appended, decoded back to the domain label strings. Error classification
//! separates bad input, a missing deployed model, and internal failures.

use std::marker::PhantomData;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::constants::{PREDICTED_COLUMN, SAVED_MODEL_DIR, SCHEMA_FILE};
use crate::error::{Error, Result};
use crate::frame::{Column, DataFrame};
use crate::labels::decode_labels;
use crate::model::{Classifier, FeatureTransformer, SensorModel};
use crate::registry::ModelResolver;
use crate::schema::DataSchema;

pub struct Predictor<T, C> {
    resolver: ModelResolver,
    schema: DataSchema,
    _marker: PhantomData<(T, C)>,
}

impl<T, C> Predictor<T, C>
where
    T: FeatureTransformer + DeserializeOwned,
    C: Classifier + DeserializeOwned,
{
    pub fn new(saved_model_dir: impl AsRef<Path>, schema: DataSchema) -> Self {
        Self {
            resolver: ModelResolver::new(saved_model_dir.as_ref()),
            schema,
            _marker: PhantomData,
        }
    }

    /// Predictor for a workspace laid out by the training pipeline
    pub fn from_workspace(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let schema = DataSchema::from_yaml_file(root.join(SCHEMA_FILE))?;
        Ok(Self::new(root.join(SAVED_MODEL_DIR), schema))
    }

    /// Score a frame and append the decoded predicted-label column
    pub fn predict_frame(&self, frame: &DataFrame) -> Result<DataFrame> {
        if frame.is_empty() {
            return Err(Error::BadInput("input contains no rows".into()));
        }
        let required = self.schema.feature_columns();
        let missing: Vec<&str> = required
            .iter()
            .filter(|name| !frame.has_column(name))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(Error::BadInput(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }
        if !self.resolver.best_model_exists() {
            return Err(Error::MissingModel(
                "train a model before requesting predictions".into(),
            ));
        }

        let model: SensorModel<T, C> = SensorModel::load(self.resolver.latest_model_path()?)?;
        let features = frame.feature_matrix(&required)?;
        let predictions = model.predict(&features)?;
        let labels = decode_labels(&predictions)?;
        info!(rows = labels.len(), "scored inference batch");

        let mut scored = frame.clone();
        scored.push_column(PREDICTED_COLUMN, Column::Categorical(labels))?;
        Ok(scored)
    }

    /// Score a CSV file and write the result next to it
    pub fn predict_csv(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<DataFrame> {
        let frame = DataFrame::from_csv_path(input.as_ref())?;
        let scored = self.predict_frame(&frame)?;
        scored.to_csv_path(output.as_ref())?;
        Ok(scored)
    }
}
