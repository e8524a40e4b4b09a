//! Materializing rendered files to disk.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::error::{RenderError, RenderResult};
use crate::files::GeneratedFile;

/// Writes a rendered file set under a root directory.
pub struct FileWriter {
    root: PathBuf,
}

impl FileWriter {
    /// Create a writer rooted at `root`. The directory is created on the
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write all files, creating parent directories as needed. Returns the
    /// absolute paths written. Absolute or parent-escaping file paths are
    /// rejected before anything touches disk.
    pub fn write_all(&self, files: &[GeneratedFile]) -> RenderResult<Vec<PathBuf>> {
        for file in files {
            Self::check_path(&file.path)?;
        }

        let mut written = Vec::with_capacity(files.len());
        for file in files {
            let target = self.root.join(&file.path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, &file.content)?;
            debug!(path = %target.display(), "Wrote generated file");
            written.push(target);
        }

        info!(
            count = written.len(),
            root = %self.root.display(),
            "Wrote generated files"
        );
        Ok(written)
    }

    fn check_path(path: &str) -> RenderResult<()> {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            return Err(RenderError::UnsafePath(path.to_string()));
        }
        if candidate
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(RenderError::UnsafePath(path.to_string()));
        }
        Ok(())
    }
}
