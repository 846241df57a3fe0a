//! Artifact mirroring to a remote object store
//!
//! On run completion or failure the orchestrator mirrors the run's artifact
//! directory (and, on success, the model registry) to a bucket path
//! namespaced by pipeline name and timestamp. The backend is a seam so the
//! pipeline does not depend on any concrete object-store client; `LocalMirror`
//! mirrors into a local bucket root and `NoopSync` disables mirroring.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Destination for mirrored artifact trees
pub trait SyncBackend {
    /// Mirror a local directory tree under the given bucket key. A missing
    /// local directory is not an error: there is nothing to mirror yet.
    fn mirror_dir(&self, local_dir: &Path, bucket_key: &str) -> Result<()>;
}

impl SyncBackend for Box<dyn SyncBackend> {
    fn mirror_dir(&self, local_dir: &Path, bucket_key: &str) -> Result<()> {
        (**self).mirror_dir(local_dir, bucket_key)
    }
}

/// Mirrors artifact trees into a directory acting as the remote bucket
#[derive(Debug, Clone)]
pub struct LocalMirror {
    bucket_root: PathBuf,
}

impl LocalMirror {
    pub fn new(bucket_root: impl Into<PathBuf>) -> Self {
        Self {
            bucket_root: bucket_root.into(),
        }
    }

    pub fn bucket_root(&self) -> &Path {
        &self.bucket_root
    }
}

impl SyncBackend for LocalMirror {
    fn mirror_dir(&self, local_dir: &Path, bucket_key: &str) -> Result<()> {
        if !local_dir.exists() {
            return Ok(());
        }
        let destination = self.bucket_root.join(bucket_key);
        copy_tree(local_dir, &destination)
    }
}

/// Backend that skips mirroring entirely
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSync;

impl SyncBackend for NoopSync {
    fn mirror_dir(&self, _local_dir: &Path, _bucket_key: &str) -> Result<()> {
        Ok(())
    }
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    std::fs::create_dir_all(to)?;
    for entry in std::fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
