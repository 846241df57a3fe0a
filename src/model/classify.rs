//! Built-in classifier: nearest class centroid

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::Classifier;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ClassCentroid {
    class: usize,
    center: Vec<f64>,
}

/// Assigns each row to the class with the closest mean feature vector.
/// Ties resolve to the lowest class index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearestCentroid {
    centroids: Vec<ClassCentroid>,
}

impl NearestCentroid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        !self.centroids.is_empty()
    }
}

impl Classifier for NearestCentroid {
    fn fit(&mut self, features: &Array2<f64>, targets: &[usize]) -> Result<()> {
        if features.nrows() == 0 {
            return Err(Error::Model("cannot fit classifier on zero rows".into()));
        }
        if features.nrows() != targets.len() {
            return Err(Error::Model(format!(
                "feature rows {} do not match target length {}",
                features.nrows(),
                targets.len()
            )));
        }

        let mut classes: Vec<usize> = targets.to_vec();
        classes.sort_unstable();
        classes.dedup();

        let mut centroids = Vec::with_capacity(classes.len());
        for class in classes {
            let rows: Vec<usize> = targets
                .iter()
                .enumerate()
                .filter(|(_, &t)| t == class)
                .map(|(i, _)| i)
                .collect();
            let mut center = vec![0.0; features.ncols()];
            for &row in &rows {
                for (j, value) in features.row(row).iter().enumerate() {
                    center[j] += value;
                }
            }
            for value in &mut center {
                *value /= rows.len() as f64;
            }
            centroids.push(ClassCentroid { class, center });
        }
        self.centroids = centroids;
        Ok(())
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>> {
        if self.centroids.is_empty() {
            return Err(Error::Model("classifier used before fit".into()));
        }
        let width = self.centroids[0].center.len();
        if features.ncols() != width {
            return Err(Error::Model(format!(
                "classifier fitted on {} columns, got {}",
                width,
                features.ncols()
            )));
        }

        let mut predictions = Vec::with_capacity(features.nrows());
        for row in features.rows() {
            let mut best_class = self.centroids[0].class;
            let mut best_distance = f64::INFINITY;
            for centroid in &self.centroids {
                let distance: f64 = row
                    .iter()
                    .zip(&centroid.center)
                    .map(|(a, b)| (a - b).powi(2))
                    .sum();
                if distance < best_distance {
                    best_distance = distance;
                    best_class = centroid.class;
                }
            }
            predictions.push(best_class);
        }
        Ok(predictions)
    }
}
