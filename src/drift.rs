//! Two-sample distribution drift detection
//!
//! Compares the train and test splits column by column with the two-sample
//! Kolmogorov-Smirnov test. A column drifts when its p-value falls below the
//! configured threshold; the run drifts when any column does. Results are
//! persisted as a YAML report mapping column name to test outcome.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Outcome of the two-sample test for one column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnDrift {
    pub statistic: f64,
    pub p_value: f64,
    pub drift: bool,
}

/// Per-column drift outcomes for one run, ordered by column name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriftReport {
    columns: BTreeMap<String, ColumnDrift>,
}

impl DriftReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, outcome: ColumnDrift) {
        self.columns.insert(column.into(), outcome);
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDrift> {
        self.columns.get(name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// True when any column drifted
    pub fn drift_detected(&self) -> bool {
        self.columns.values().any(|c| c.drift)
    }

    /// Write the report as YAML, replacing any previous report at the path
    pub fn write_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn read_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }
}

/// Run the two-sample test on one column pair at the given p-value threshold
pub fn test_column(reference: &[f64], candidate: &[f64], threshold: f64) -> ColumnDrift {
    let (statistic, p_value) = ks_two_sample(reference, candidate);
    ColumnDrift {
        statistic,
        p_value,
        drift: p_value < threshold,
    }
}

/// Two-sample Kolmogorov-Smirnov test
///
/// Returns (statistic, p_value). NaN values are ignored; an empty sample on
/// either side gives the degenerate (0.0, 1.0) outcome rather than an error,
/// so constant or all-missing columns never abort a validation run.
pub fn ks_two_sample(reference: &[f64], candidate: &[f64]) -> (f64, f64) {
    let mut a: Vec<f64> = reference.iter().copied().filter(|v| !v.is_nan()).collect();
    let mut b: Vec<f64> = candidate.iter().copied().filter(|v| !v.is_nan()).collect();
    if a.is_empty() || b.is_empty() {
        return (0.0, 1.0);
    }
    a.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    b.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;

    // Walk both empirical CDFs, advancing past ties on both sides together so
    // identical samples yield a zero statistic.
    let mut d_max = 0.0f64;
    let mut i = 0usize;
    let mut j = 0usize;
    while i < a.len() && j < b.len() {
        let v = a[i].min(b[j]);
        while i < a.len() && a[i] <= v {
            i += 1;
        }
        while j < b.len() && b[j] <= v {
            j += 1;
        }
        let diff = (i as f64 / n1 - j as f64 / n2).abs();
        d_max = d_max.max(diff);
    }

    let n_eff = (n1 * n2) / (n1 + n2);
    let lambda = d_max * n_eff.sqrt();
    (d_max, ks_p_value(lambda))
}

/// Asymptotic p-value for the KS statistic via the Kolmogorov distribution:
/// P(D > d) ~ 2 * sum_{k>=1} (-1)^{k+1} exp(-2 k^2 lambda^2)
fn ks_p_value(lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }
    let mut p = 0.0;
    for k in 1..=100 {
        let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
        let term = sign * (-2.0 * f64::from(k).powi(2) * lambda.powi(2)).exp();
        p += term;
        if term.abs() < 1e-10 {
            break;
        }
    }
    (2.0 * p).clamp(0.0, 1.0)
}
