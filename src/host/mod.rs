//! Host bridge for running the installer outside the editor

use crate::core::path::{ensure_dir, temp_dir};
use crate::core::InstallerResult;
use crate::di::HostBridge;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Asset roots searched for `.meta` files
const ASSET_ROOTS: &[&str] = &["Assets", "Packages"];

/// A [`HostBridge`] backed by nothing but the project directory
///
/// There is no package manager to notify, so resolution requests are only
/// logged and counted. Dialogs go to stderr.
pub struct HeadlessHost {
    project_root: PathBuf,
    resolutions: AtomicUsize,
    temp_counter: AtomicU64,
}

impl HeadlessHost {
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            resolutions: AtomicUsize::new(0),
            temp_counter: AtomicU64::new(0),
        }
    }

    /// Number of resolution requests received
    pub fn resolution_count(&self) -> usize {
        self.resolutions.load(Ordering::SeqCst)
    }
}

/// Read the `guid:` line of a `.meta` file
fn meta_guid(meta_path: &Path) -> Option<String> {
    let content = fs::read_to_string(meta_path).ok()?;
    content.lines().find_map(|line| {
        line.trim()
            .strip_prefix("guid:")
            .map(|guid| guid.trim().to_string())
    })
}

impl HostBridge for HeadlessHost {
    fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn trigger_resolution(&self) -> InstallerResult<()> {
        let n = self.resolutions.fetch_add(1, Ordering::SeqCst) + 1;
        info!(request = n, "Package resolution requested (no package manager attached)");
        Ok(())
    }

    fn display_dialog(&self, title: &str, message: &str) {
        eprintln!("\n{}\n{}\n", title, message);
    }

    fn unique_temp_path(&self) -> InstallerResult<PathBuf> {
        let dir = temp_dir(&self.project_root);
        ensure_dir(&dir)?;

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        loop {
            let n = self.temp_counter.fetch_add(1, Ordering::SeqCst);
            let candidate = dir.join(format!(
                "InstallerTemp-{}-{}-{}",
                std::process::id(),
                nanos,
                n
            ));
            if !candidate.exists() {
                return Ok(candidate);
            }
        }
    }

    fn asset_path_for_guid(&self, guid: &str) -> Option<PathBuf> {
        for root in ASSET_ROOTS {
            let dir = self.project_root.join(root);
            if !dir.is_dir() {
                continue;
            }
            for entry in WalkDir::new(&dir).into_iter().filter_map(|e| e.ok()) {
                let path = entry.path();
                if !entry.file_type().is_file()
                    || path.extension().and_then(|e| e.to_str()) != Some("meta")
                {
                    continue;
                }
                if meta_guid(path).as_deref() != Some(guid) {
                    continue;
                }
                let asset = path.with_extension("");
                return match asset.strip_prefix(&self.project_root) {
                    Ok(relative) => Some(relative.to_path_buf()),
                    Err(_) => {
                        warn!("Asset outside the project: {}", asset.display());
                        None
                    }
                };
            }
        }
        None
    }
}
