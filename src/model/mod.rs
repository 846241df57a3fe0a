//! Model seam
//!
//! The pipeline core never commits to a concrete numerical library. Feature
//! engineering and classification sit behind the [`FeatureTransformer`] and
//! [`Classifier`] traits so stages stay testable with stub implementations,
//! and [`SensorModel`] bundles a fitted pair into the single serialized object
//! that moves through the registry.

mod classify;
mod preprocess;

pub use classify::NearestCentroid;
pub use preprocess::StandardPreprocessor;

use std::path::Path;

use ndarray::Array2;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Fit/transform contract for feature engineering
pub trait FeatureTransformer {
    /// Learn transformation parameters from the training features
    fn fit(&mut self, features: &Array2<f64>) -> Result<()>;

    /// Apply the learned transformation
    fn transform(&self, features: &Array2<f64>) -> Result<Array2<f64>>;
}

/// Fit/predict contract for classification
pub trait Classifier {
    /// Fit on transformed features and class indices
    fn fit(&mut self, features: &Array2<f64>, targets: &[usize]) -> Result<()>;

    /// Predict class indices for transformed features
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>>;
}

/// A fitted preprocessor and classifier shipped as one deployable unit
///
/// Prediction applies the preprocessor first, then the classifier, so callers
/// feed raw feature matrices and never re-implement the transformation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorModel<T, C> {
    pub preprocessor: T,
    pub classifier: C,
}

impl<T, C> SensorModel<T, C> {
    pub fn new(preprocessor: T, classifier: C) -> Self {
        Self {
            preprocessor,
            classifier,
        }
    }
}

impl<T: FeatureTransformer, C: Classifier> SensorModel<T, C> {
    /// Transform raw features and predict class indices
    pub fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>> {
        let transformed = self.preprocessor.transform(features)?;
        self.classifier.predict(&transformed)
    }
}

impl<T: Serialize, C: Serialize> SensorModel<T, C> {
    /// Persist the bundle as JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl<T: DeserializeOwned, C: DeserializeOwned> SensorModel<T, C> {
    /// Load a bundle previously written by [`SensorModel::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }
}
