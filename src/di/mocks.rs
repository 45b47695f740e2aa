//! Mock implementations of service traits for testing

use super::traits::{HostBridge, PackageClient};
use crate::core::path::{ensure_dir, temp_dir};
use crate::core::{InstallerError, InstallerResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock host for testing
///
/// Counts resolution requests, records dialogs, and hands out temp paths
/// under `<root>/Temp`.
///
/// # Example
///
/// ```
/// use vrcf_installer::di::mocks::MockHost;
/// use vrcf_installer::di::HostBridge;
/// use std::path::PathBuf;
///
/// let host = MockHost::new("/tmp/project");
/// host.add_asset("00b990f230095454f82c345d433841ae", "Assets/Old/Installer.cs");
///
/// assert_eq!(
///     host.asset_path_for_guid("00b990f230095454f82c345d433841ae"),
///     Some(PathBuf::from("Assets/Old/Installer.cs"))
/// );
/// ```
#[derive(Clone)]
pub struct MockHost {
    root: PathBuf,
    resolutions: Arc<AtomicUsize>,
    fail_resolution: Arc<AtomicBool>,
    dialogs: Arc<Mutex<Vec<(String, String)>>>,
    assets: Arc<Mutex<HashMap<String, PathBuf>>>,
    temp_counter: Arc<AtomicUsize>,
}

impl MockHost {
    /// Create a new mock host rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            resolutions: Arc::new(AtomicUsize::new(0)),
            fail_resolution: Arc::new(AtomicBool::new(false)),
            dialogs: Arc::new(Mutex::new(Vec::new())),
            assets: Arc::new(Mutex::new(HashMap::new())),
            temp_counter: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Register an asset for GUID lookup
    pub fn add_asset(&self, guid: &str, path: impl Into<PathBuf>) {
        self.assets
            .lock()
            .unwrap()
            .insert(guid.to_string(), path.into());
    }

    /// Make every resolution request fail
    pub fn fail_resolution(&self) {
        self.fail_resolution.store(true, Ordering::SeqCst);
    }

    /// Number of resolution requests so far
    pub fn resolution_count(&self) -> usize {
        self.resolutions.load(Ordering::SeqCst)
    }

    /// All dialogs shown so far, as (title, message)
    pub fn dialogs(&self) -> Vec<(String, String)> {
        self.dialogs.lock().unwrap().clone()
    }
}

impl HostBridge for MockHost {
    fn project_root(&self) -> &Path {
        &self.root
    }

    fn trigger_resolution(&self) -> InstallerResult<()> {
        if self.fail_resolution.load(Ordering::SeqCst) {
            return Err(InstallerError::Unexpected(
                "package manager rejected the resolve request".to_string(),
            ));
        }
        self.resolutions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn display_dialog(&self, title: &str, message: &str) {
        self.dialogs
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }

    fn unique_temp_path(&self) -> InstallerResult<PathBuf> {
        let dir = temp_dir(&self.root);
        ensure_dir(&dir)?;
        let n = self.temp_counter.fetch_add(1, Ordering::SeqCst);
        Ok(dir.join(format!("mock-tmp-{}", n)))
    }

    fn asset_path_for_guid(&self, guid: &str) -> Option<PathBuf> {
        self.assets.lock().unwrap().get(guid).cloned()
    }
}

/// Mock package client for testing
///
/// Serves a fixed archive for every URL, or fails every request.
#[derive(Clone)]
pub struct MockPackageClient {
    archive: Option<Vec<u8>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockPackageClient {
    /// Serve `archive` for every request
    pub fn serving(archive: Vec<u8>) -> Self {
        Self {
            archive: Some(archive),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail every request
    pub fn failing() -> Self {
        Self {
            archive: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// URLs requested so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PackageClient for MockPackageClient {
    async fn download_archive(&self, url: &str, dest: &Path) -> InstallerResult<u64> {
        self.requests.lock().unwrap().push(url.to_string());

        let archive = self.archive.as_ref().ok_or_else(|| {
            InstallerError::Unexpected(format!("Failed to download {}: no archive mocked", url))
        })?;

        let mut file = OpenOptions::new().write(true).create_new(true).open(dest)?;
        file.write_all(archive)?;
        Ok(archive.len() as u64)
    }
}
