//! Removal of stale installs and the move of a staged package into place

use crate::core::path::{ensure_dir, resolve};
use crate::core::{InstallerError, InstallerResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Deletes and moves package directories inside one project
///
/// Relative paths are resolved against the project root.
pub struct DirectorySwapper {
    project_root: PathBuf,
    install_marker_dir: PathBuf,
}

impl DirectorySwapper {
    pub fn new(project_root: &Path, install_marker_dir: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            install_marker_dir: install_marker_dir.to_path_buf(),
        }
    }

    /// Delete a directory tree or a file
    ///
    /// Returns whether anything was removed. Blank or missing paths are a
    /// no-op.
    pub fn delete_path(&self, path: &Path) -> InstallerResult<bool> {
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            return Ok(false);
        }
        let full = resolve(&self.project_root, path);

        if full.is_dir() {
            info!("Deleting directory: {}", path.display());
            fs::remove_dir_all(&full).map_err(|e| {
                InstallerError::Filesystem(format!(
                    "Failed to delete directory {}: {}",
                    full.display(),
                    e
                ))
            })?;
            return Ok(true);
        }
        if full.is_file() {
            info!("Deleting file: {}", path.display());
            fs::remove_file(&full).map_err(|e| {
                InstallerError::Filesystem(format!("Failed to delete file {}: {}", full.display(), e))
            })?;
            return Ok(true);
        }

        Ok(false)
    }

    /// Move the staging directory to `final_dir` with a single rename
    ///
    /// `final_dir` must not exist. The in-progress marker is created first
    /// and is left for the host's temp cleanup.
    pub fn swap_in(&self, staging_dir: &Path, final_dir: &Path) -> InstallerResult<()> {
        let staging = resolve(&self.project_root, staging_dir);
        let target = resolve(&self.project_root, final_dir);

        if !staging.is_dir() {
            return Err(InstallerError::Filesystem(format!(
                "Staging directory {} does not exist",
                staging.display()
            )));
        }
        if target.exists() {
            return Err(InstallerError::Filesystem(format!(
                "{} already exists; the previous install must be deleted first",
                target.display()
            )));
        }

        ensure_dir(&resolve(&self.project_root, &self.install_marker_dir))?;
        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }

        info!("Moving {} to {}", staging.display(), final_dir.display());
        fs::rename(&staging, &target).map_err(|e| {
            InstallerError::Filesystem(format!(
                "Failed to move {} to {}: {}",
                staging.display(),
                target.display(),
                e
            ))
        })?;
        Ok(())
    }
}
