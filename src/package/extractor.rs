//! Zip extraction into a staging directory

use crate::core::{InstallerError, InstallerResult};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

/// Extracts the downloaded package zip into a staging directory
pub struct PackageExtractor {
    dest_dir: PathBuf,
}

/// Last segment of an entry name; empty for directory markers like `sub/`
fn entry_file_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or("")
}

impl PackageExtractor {
    /// Create a new PackageExtractor
    ///
    /// `dest_dir` is the staging directory. It is created if missing and
    /// is never reused across runs.
    pub fn new(dest_dir: PathBuf) -> Self {
        Self { dest_dir }
    }

    /// Extract every file entry, keeping its relative path
    ///
    /// Returns the staging directory.
    pub fn extract(&self, archive_path: &Path) -> InstallerResult<PathBuf> {
        let file = File::open(archive_path).map_err(|e| {
            InstallerError::Archive(format!("Failed to open {}: {}", archive_path.display(), e))
        })?;
        let mut archive = ZipArchive::new(file)
            .map_err(|e| InstallerError::Archive(format!("Invalid zip: {}", e)))?;

        fs::create_dir_all(&self.dest_dir).map_err(|e| self.io_error(&self.dest_dir, e))?;

        let mut extracted = 0usize;
        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| InstallerError::Archive(format!("Invalid zip entry {}: {}", index, e)))?;

            if entry_file_name(entry.name()).trim().is_empty() {
                continue;
            }

            let relative = entry.enclosed_name().map(Path::to_path_buf).ok_or_else(|| {
                InstallerError::Archive(format!(
                    "Entry escapes the staging directory: {}",
                    entry.name()
                ))
            })?;
            let out_path = self.dest_dir.join(relative);

            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(parent, e))?;
            }
            let mut out_file = File::create(&out_path).map_err(|e| self.io_error(&out_path, e))?;
            io::copy(&mut entry, &mut out_file).map_err(|e| self.io_error(&out_path, e))?;
            extracted += 1;
        }

        debug!(files = extracted, dest = %self.dest_dir.display(), "Extracted archive");
        Ok(self.dest_dir.clone())
    }

    fn io_error(&self, path: &Path, e: io::Error) -> InstallerError {
        InstallerError::Archive(format!("Failed to extract to {}: {}", path.display(), e))
    }
}
