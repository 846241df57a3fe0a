//! Classification metrics
//!
//! Binary precision, recall, and F1 on the positive class, computed from
//! predicted and true class indices. The metric triple travels inside the
//! trainer and evaluation artifacts and drives the promotion decision.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::labels::TargetLabel;

/// Precision, recall, and F1 for the positive class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub f1_score: f64,
    pub precision_score: f64,
    pub recall_score: f64,
}

impl ClassificationMetrics {
    /// Compute metrics from true and predicted class indices
    pub fn from_predictions(y_true: &[usize], y_pred: &[usize]) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(Error::BadInput(format!(
                "prediction length {} does not match target length {}",
                y_pred.len(),
                y_true.len()
            )));
        }
        if y_true.is_empty() {
            return Err(Error::BadInput(
                "cannot compute metrics on empty predictions".into(),
            ));
        }

        let positive = TargetLabel::Positive.class();
        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;
        for (&truth, &pred) in y_true.iter().zip(y_pred.iter()) {
            match (truth == positive, pred == positive) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
        }

        let tp = tp as f64;
        let precision = if tp + fp as f64 > 0.0 {
            tp / (tp + fp as f64)
        } else {
            0.0
        };
        let recall = if tp + fn_ as f64 > 0.0 {
            tp / (tp + fn_ as f64)
        } else {
            0.0
        };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Ok(Self {
            f1_score: f1,
            precision_score: precision,
            recall_score: recall,
        })
    }
}
