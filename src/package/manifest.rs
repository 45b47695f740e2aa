//! Line-oriented manifest matching and rewriting

use crate::config::InstallerConfig;
use crate::core::{InstallerError, InstallerResult};
use crate::di::ManifestStore;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Substrings used to classify manifest lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestMarkers {
    /// Present on every line of the package family
    pub namespace: String,
    /// Present on the main package's own line
    pub main_package: String,
    /// Present when a package points at a local directory
    pub local_file: String,
    /// Present when a package points at a packaged archive
    pub archive: String,
}

impl ManifestMarkers {
    pub fn from_config(config: &InstallerConfig) -> Self {
        Self {
            namespace: config.namespace_marker.clone(),
            main_package: config.main_package.clone(),
            local_file: config.local_file_marker.clone(),
            archive: config.archive_marker.clone(),
        }
    }

    /// A family package referenced from a local checkout
    pub fn is_local_dev_line(&self, line: &str) -> bool {
        line.contains(&self.namespace)
            && line.contains(&self.local_file)
            && !line.contains(&self.archive)
    }

    pub fn should_remove(&self, line: &str, main_package_only: bool) -> bool {
        line.contains(&self.namespace)
            && (!main_package_only || line.contains(&self.main_package))
    }
}

/// Manifest store that treats every line as an opaque string
pub struct LineManifestStore {
    path: PathBuf,
    markers: ManifestMarkers,
}

impl LineManifestStore {
    pub fn new(path: PathBuf, markers: ManifestMarkers) -> Self {
        Self { path, markers }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all lines and the line ending they use, or `None` when the
    /// manifest does not exist
    fn read_lines(&self) -> InstallerResult<Option<(Vec<String>, &'static str)>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };
                Ok(Some((content.lines().map(str::to_string).collect(), newline)))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(InstallerError::Filesystem(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Stage the lines next to the manifest, then move them over it
    fn write_lines(&self, lines: &[String], newline: &str) -> InstallerResult<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let fs_err = |e: io::Error| {
            InstallerError::Filesystem(format!("Failed to rewrite {}: {}", self.path.display(), e))
        };

        let mut staged = NamedTempFile::new_in(dir).map_err(fs_err)?;
        for line in lines {
            write!(staged, "{}{}", line, newline).map_err(fs_err)?;
        }
        staged.as_file().sync_all().map_err(fs_err)?;
        staged
            .persist(&self.path)
            .map_err(|e| fs_err(e.error))?;
        Ok(())
    }
}

impl ManifestStore for LineManifestStore {
    fn has_local_dev_install(&self) -> InstallerResult<bool> {
        let Some((lines, _)) = self.read_lines()? else {
            return Ok(false);
        };
        Ok(lines.iter().any(|line| self.markers.is_local_dev_line(line)))
    }

    fn remove_entries(&self, main_package_only: bool) -> InstallerResult<bool> {
        let Some((lines, newline)) = self.read_lines()? else {
            debug!(path = %self.path.display(), "No manifest, nothing to clean");
            return Ok(false);
        };

        let original_len = lines.len();
        let kept: Vec<String> = lines
            .into_iter()
            .filter(|line| {
                let remove = self.markers.should_remove(line, main_package_only);
                if remove {
                    info!("Removing manifest line: {}", line);
                }
                !remove
            })
            .collect();

        if kept.len() == original_len {
            return Ok(false);
        }
        self.write_lines(&kept, newline)?;
        Ok(true)
    }
}
