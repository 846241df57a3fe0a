//! Built-in preprocessing: mean imputation followed by standardization

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::FeatureTransformer;
use crate::error::{Error, Result};

/// Floor for the scale so constant columns divide by one, not zero
const MIN_STD: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ColumnStats {
    means: Vec<f64>,
    stds: Vec<f64>,
}

/// Imputes missing values with the column mean, then centers and scales
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardPreprocessor {
    stats: Option<ColumnStats>,
}

impl StandardPreprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.stats.is_some()
    }
}

impl FeatureTransformer for StandardPreprocessor {
    fn fit(&mut self, features: &Array2<f64>) -> Result<()> {
        if features.nrows() == 0 {
            return Err(Error::Model("cannot fit preprocessor on zero rows".into()));
        }
        let mut means = Vec::with_capacity(features.ncols());
        let mut stds = Vec::with_capacity(features.ncols());
        for column in features.columns() {
            let present: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
            if present.is_empty() {
                // all-missing column: impute zero, leave scale neutral
                means.push(0.0);
                stds.push(1.0);
                continue;
            }
            let mean = present.iter().sum::<f64>() / present.len() as f64;
            let variance =
                present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / present.len() as f64;
            means.push(mean);
            stds.push(variance.sqrt().max(MIN_STD));
        }
        self.stats = Some(ColumnStats { means, stds });
        Ok(())
    }

    fn transform(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        let stats = self
            .stats
            .as_ref()
            .ok_or_else(|| Error::Model("preprocessor used before fit".into()))?;
        if features.ncols() != stats.means.len() {
            return Err(Error::Model(format!(
                "preprocessor fitted on {} columns, got {}",
                stats.means.len(),
                features.ncols()
            )));
        }
        let mut transformed = features.clone();
        for ((_, col), value) in transformed.indexed_iter_mut() {
            let mean = stats.means[col];
            let std = stats.stds[col];
            let raw = if value.is_nan() { mean } else { *value };
            *value = (raw - mean) / std;
        }
        Ok(transformed)
    }
}
