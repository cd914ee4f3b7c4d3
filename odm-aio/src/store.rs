// odm-aio/src/store.rs
//! The local mirror of the upstream library tree.

use std::path::{Path, PathBuf};

use odm_common::error::{OdmError, Result};
use odm_common::model::RelativePath;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::fs as odm_fs;

/// Local library root. Paths under it mirror the remote tree exactly.
///
/// There is no locking: two processes materializing into the same root at
/// once is unsupported.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

/// Bytes written for a path but not yet visible at it.
///
/// Dropping a `StagedFile` without calling [`StagedFile::commit`] discards
/// the bytes.
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    target: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn local_path(&self, path: &RelativePath) -> PathBuf {
        path.to_local(&self.root)
    }

    /// Whether a materialized file exists for `path`.
    pub fn exists(&self, path: &RelativePath) -> bool {
        odm_fs::is_file(&self.local_path(path))
    }

    pub fn dir_exists(&self, path: &RelativePath) -> bool {
        odm_fs::is_directory(&self.local_path(path))
    }

    pub fn ensure_dir(&self, path: &RelativePath) -> Result<()> {
        odm_fs::create_dir_all(&self.local_path(path))
    }

    /// Creates all missing ancestors of `path`.
    pub fn ensure_parent_dir(&self, path: &RelativePath) -> Result<()> {
        let local = self.local_path(path);
        match local.parent() {
            Some(parent) => odm_fs::create_dir_all(parent),
            None => Err(OdmError::storage(&local, "cannot get parent directory")),
        }
    }

    /// Creates or replaces `path` with `content`; readers never see a
    /// partial file.
    pub fn write(&self, path: &RelativePath, content: &[u8]) -> Result<()> {
        odm_fs::atomic_write_file(&self.local_path(path), content)
    }

    /// Writes `content` for `path` without making it visible yet.
    pub fn stage(&self, path: &RelativePath, content: &[u8]) -> Result<StagedFile> {
        let target = self.local_path(path);
        let temp = odm_fs::write_temp_file(&target, content)?;
        Ok(StagedFile { temp, target })
    }

    /// Reads a materialized file for the host's code loader.
    pub fn load(&self, path: &RelativePath) -> Result<Vec<u8>> {
        let local = self.local_path(path);
        if !odm_fs::check_path_exists(&local) {
            return Err(OdmError::NotFound(local.display().to_string()));
        }
        odm_fs::read_to_bytes(&local)
    }
}

impl StagedFile {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Atomically moves the staged bytes into place.
    pub fn commit(self) -> Result<PathBuf> {
        debug!("Committing {}", self.target.display());
        odm_fs::persist_temp_file(self.temp, &self.target)?;
        Ok(self.target)
    }
}
