//! Output directory management.

use std::fs;
use std::path::{Path, PathBuf};

use super::{RenderError, RenderResult};

/// The directory artifacts are written into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    root: PathBuf,
}

impl OutputLocation {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory and its parents if absent. Existing contents are
    /// left alone.
    pub fn ensure(&self) -> RenderResult<()> {
        fs::create_dir_all(&self.root).map_err(|source| RenderError::Io {
            path: self.root.clone(),
            source,
        })
    }

    /// Path of an artifact inside the directory.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }
}
