//! Trait definitions for dependency injection

use crate::core::InstallerResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Services the host application provides to the installer
///
/// Every method except `project_root` touches live host state and must only
/// be called from the host's main thread (see [`crate::dispatch::MainThread`]).
pub trait HostBridge: Send + Sync {
    /// Root of the project being updated
    fn project_root(&self) -> &Path;

    /// Ask the host to re-resolve its installed packages
    fn trigger_resolution(&self) -> InstallerResult<()>;

    /// Show a modal message with a single acknowledgement
    fn display_dialog(&self, title: &str, message: &str);

    /// A fresh path inside the project scratch area that does not exist yet
    fn unique_temp_path(&self) -> InstallerResult<PathBuf>;

    /// Current project-relative path of the asset with the given stable id
    fn asset_path_for_guid(&self, guid: &str) -> Option<PathBuf>;
}

/// Reads and rewrites the host's package manifest
///
/// Matching is by substring only. Implementations with a structured parser
/// can replace the line-based one without touching the installer.
pub trait ManifestStore: Send + Sync {
    /// True if a family package is referenced from a local directory
    fn has_local_dev_install(&self) -> InstallerResult<bool>;

    /// Drop family entries (or only the main package's) and report whether
    /// anything was removed
    fn remove_entries(&self, main_package_only: bool) -> InstallerResult<bool>;
}

/// Transport for the package archive
#[async_trait]
pub trait PackageClient: Send + Sync {
    /// Download `url` into a new file at `dest`, returning the byte count
    ///
    /// `dest` must not exist yet.
    async fn download_archive(&self, url: &str, dest: &Path) -> InstallerResult<u64>;
}
