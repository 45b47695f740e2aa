//! Installer settings: built-in defaults plus optional YAML overrides

use crate::core::path::{ensure_relative, with_appended_extension};
use crate::core::{InstallerError, InstallerResult, SupportLinks};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fixed values that drive one install run.
///
/// The installer never writes this anywhere. An embedding application can
/// override fields from YAML; anything left out keeps its default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Where the latest package zip is fetched from
    pub download_url: String,

    /// Name of the package this installer manages
    pub main_package: String,

    /// Substring that marks any line belonging to the package family
    pub namespace_marker: String,

    /// Substring that marks a local directory reference in the manifest
    pub local_file_marker: String,

    /// Substring that marks a packaged archive reference in the manifest
    pub archive_marker: String,

    /// Manifest path, relative to the project root
    pub manifest_path: PathBuf,

    /// Directory that holds installed packages, relative to the project root
    pub packages_dir: PathBuf,

    /// Advisory "install in progress" marker, relative to the project root
    pub install_marker_dir: PathBuf,

    /// Obsolete companion packages removed after the new package is in place
    pub legacy_paths: Vec<PathBuf>,

    /// Stable asset id of old installer copies, wherever the user moved them
    pub legacy_installer_guid: String,

    /// Pause after the first cleanup when something was removed
    pub restart_delay_secs: u64,

    pub dialog_title: String,

    pub download_page: String,

    pub support_channel: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            download_url: "https://vrcfury.com/downloadRawZip".to_string(),
            main_package: "com.vrcfury.vrcfury".to_string(),
            namespace_marker: "com.vrcfury.".to_string(),
            local_file_marker: "file:".to_string(),
            archive_marker: "tgz".to_string(),
            manifest_path: PathBuf::from("Packages/manifest.json"),
            packages_dir: PathBuf::from("Packages"),
            install_marker_dir: PathBuf::from("Temp/vrcfInstalling"),
            legacy_paths: vec![
                PathBuf::from("Assets/VRCFury"),
                PathBuf::from("Assets/VRCFury-installer"),
                PathBuf::from("Packages/com.vrcfury.legacyprefabs.tgz"),
                PathBuf::from("Packages/com.vrcfury.legacyprefabs"),
                PathBuf::from("Packages/com.vrcfury.updater.tgz"),
                PathBuf::from("Packages/com.vrcfury.updater"),
                PathBuf::from("Packages/com.vrcfury.installer"),
            ],
            legacy_installer_guid: "00b990f230095454f82c345d433841ae".to_string(),
            restart_delay_secs: 10,
            dialog_title: "VRCFury Installer".to_string(),
            download_page: SupportLinks::default().download_page,
            support_channel: SupportLinks::default().support_channel,
        }
    }
}

impl InstallerConfig {
    /// Parse overrides from YAML and validate them
    pub fn from_yaml_str(content: &str) -> InstallerResult<Self> {
        let config: InstallerConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load overrides from a YAML file
    pub fn from_yaml_file(path: &Path) -> InstallerResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            InstallerError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Every path the installer deletes or writes must stay inside the project.
    pub fn validate(&self) -> InstallerResult<()> {
        if self.main_package.trim().is_empty() {
            return Err(InstallerError::Config(
                "main_package must not be empty".to_string(),
            ));
        }
        if self.namespace_marker.is_empty() {
            return Err(InstallerError::Config(
                "namespace_marker must not be empty".to_string(),
            ));
        }
        ensure_relative(&self.manifest_path)?;
        ensure_relative(&self.packages_dir)?;
        ensure_relative(&self.install_marker_dir)?;
        for path in &self.legacy_paths {
            ensure_relative(path)?;
        }
        Ok(())
    }

    /// Installed package directory (Packages/com.vrcfury.vrcfury)
    pub fn package_dir(&self) -> PathBuf {
        self.packages_dir.join(&self.main_package)
    }

    /// Packaged archive left behind by older installs (Packages/com.vrcfury.vrcfury.tgz)
    pub fn package_archive(&self) -> PathBuf {
        with_appended_extension(&self.package_dir(), "tgz")
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_secs(self.restart_delay_secs)
    }

    pub fn support_links(&self) -> SupportLinks {
        SupportLinks {
            download_page: self.download_page.clone(),
            support_channel: self.support_channel.clone(),
        }
    }
}
