//! Common utilities for integration tests

use std::collections::BTreeMap;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use vrcf_installer::config::InstallerConfig;
use vrcf_installer::di::mocks::MockHost;
use vrcf_installer::di::{PackageClient, ServiceContainer};
use vrcf_installer::dispatch::MainThreadExecutor;
use vrcf_installer::package::{InstallOutcome, PackageInstaller};
use walkdir::WalkDir;
use zip::write::{FileOptions, ZipWriter};

/// A temporary project with `Packages/manifest.json`
pub fn project_with_manifest(manifest: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("Packages")).unwrap();
    fs::write(temp.path().join("Packages/manifest.json"), manifest).unwrap();
    temp
}

/// Build a zip in memory; names ending in `/` become directory entries
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, FileOptions::default()).unwrap();
        } else {
            zip.start_file(*name, FileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
    }
    zip.finish().unwrap().into_inner()
}

/// Every file and directory under `root` with file contents
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| {
            let content = if entry.file_type().is_file() {
                Some(fs::read(entry.path()).unwrap())
            } else {
                None
            };
            (entry.path().to_path_buf(), content)
        })
        .collect()
}

/// Config for tests: no restart pause, download from `url`
pub fn test_config(url: &str) -> InstallerConfig {
    InstallerConfig {
        download_url: url.to_string(),
        restart_delay_secs: 0,
        ..Default::default()
    }
}

/// Run one install, with a task standing in for the host's main thread
pub async fn run_installer(
    host: MockHost,
    client: Arc<dyn PackageClient>,
    config: InstallerConfig,
) -> InstallOutcome {
    let services = ServiceContainer::with_host_and_client(Arc::new(host), client, config);
    let (main_thread, executor) = MainThreadExecutor::new();
    let main_loop = tokio::spawn(executor.run());

    let outcome = PackageInstaller::new(services, main_thread)
        .launch()
        .await
        .unwrap();
    main_loop.await.unwrap();
    outcome
}
