//! Saved-model registry resolution
//!
//! Deployed models live under a registry root whose subdirectories are named
//! by Unix timestamp. The numerically largest name is the current best model;
//! comparison is numeric, never lexicographic, so version `10` beats `9`.
//! Entries that do not parse as numbers are ignored.

use std::path::{Path, PathBuf};

use crate::constants::MODEL_FILE;
use crate::error::{Error, Result};

/// Resolves the latest deployed model inside a registry directory
#[derive(Debug, Clone)]
pub struct ModelResolver {
    saved_model_dir: PathBuf,
}

impl ModelResolver {
    pub fn new(saved_model_dir: impl Into<PathBuf>) -> Self {
        Self {
            saved_model_dir: saved_model_dir.into(),
        }
    }

    pub fn saved_model_dir(&self) -> &Path {
        &self.saved_model_dir
    }

    /// Largest numeric version present, if any
    pub fn latest_version(&self) -> Option<u64> {
        let entries = std::fs::read_dir(&self.saved_model_dir).ok()?;
        entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().to_str().and_then(|n| n.parse::<u64>().ok()))
            .max()
    }

    /// Whether any deployed model version exists
    pub fn best_model_exists(&self) -> bool {
        self.latest_version().is_some()
    }

    /// Path of the model file inside the latest version directory
    pub fn latest_model_path(&self) -> Result<PathBuf> {
        let version = self.latest_version().ok_or_else(|| {
            Error::MissingModel(format!(
                "no deployed model under {}",
                self.saved_model_dir.display()
            ))
        })?;
        Ok(self
            .saved_model_dir
            .join(version.to_string())
            .join(MODEL_FILE))
    }
}
