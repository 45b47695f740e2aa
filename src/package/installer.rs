//! Self-update workflow for the main package
//!
//! One run goes through these stages:
//!
//! 1. Skip entirely if the manifest points the package family at a local
//!    checkout.
//! 2. Delete the previous archive, the previous package directory, and the
//!    main package's manifest line, then ask the host to re-resolve.
//! 3. If step 2 removed anything, pause so the host can finish unloading
//!    the old package. The host may tear this run down during the pause;
//!    the next load starts over from step 1.
//! 4. Download and extract the latest zip into a staging directory.
//! 5. On the main thread: move the staging directory into place, strip the
//!    remaining family lines from the manifest, delete legacy companion
//!    packages, and re-resolve again.
//!
//! Every step is safe to repeat, so a failed run is simply retried by the
//! next host load. Nothing is rolled back.

use crate::core::path::with_appended_extension;
use crate::core::{format_error_with_help, InstallerError, InstallerResult};
use crate::di::ServiceContainer;
use crate::dispatch::MainThread;
use crate::package::extractor::PackageExtractor;
use crate::package::swapper::DirectorySwapper;
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    Idle,
    CheckingDevMode,
    CleaningOld,
    RestartPause,
    Downloading,
    Extracting,
    SwappingIn,
    CleaningLegacy,
    ReResolving,
    Done,
    Failed,
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstallStage::Idle => "idle",
            InstallStage::CheckingDevMode => "checking-dev-mode",
            InstallStage::CleaningOld => "cleaning-old",
            InstallStage::RestartPause => "restart-pause",
            InstallStage::Downloading => "downloading",
            InstallStage::Extracting => "extracting",
            InstallStage::SwappingIn => "swapping-in",
            InstallStage::CleaningLegacy => "cleaning-legacy",
            InstallStage::ReResolving => "re-resolving",
            InstallStage::Done => "done",
            InstallStage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The manifest references a family package from a local directory
    LocalDevInstall,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::LocalDevInstall => write!(
                f,
                "a vrcfury package is installed in development mode (local directory)"
            ),
        }
    }
}

/// Terminal result of one run
#[derive(Debug)]
pub enum InstallOutcome {
    Skipped(SkipReason),
    /// `restarted` is true when the old install was removed and the run
    /// paused for the host to settle
    Succeeded { restarted: bool },
    Failed {
        stage: InstallStage,
        error: InstallerError,
    },
}

impl InstallOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, InstallOutcome::Failed { .. })
    }
}

/// Shared view of the current stage, updated from both the background task
/// and main-thread operations
#[derive(Clone)]
struct StageTracker {
    stage: Arc<Mutex<InstallStage>>,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            stage: Arc::new(Mutex::new(InstallStage::Idle)),
        }
    }

    fn enter(&self, next: InstallStage) {
        let mut stage = self.stage.lock().unwrap_or_else(|e| e.into_inner());
        debug!(from = %*stage, to = %next, "Install stage");
        *stage = next;
    }

    fn current(&self) -> InstallStage {
        *self.stage.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Drives one self-update run against the services in a container
pub struct PackageInstaller {
    services: ServiceContainer,
    main_thread: MainThread,
    swapper: Arc<DirectorySwapper>,
    stage: StageTracker,
}

impl PackageInstaller {
    /// Create an installer with injected services
    pub fn new(services: ServiceContainer, main_thread: MainThread) -> Self {
        let swapper = Arc::new(DirectorySwapper::new(
            services.host().project_root(),
            &services.config().install_marker_dir,
        ));
        Self {
            services,
            main_thread,
            swapper,
            stage: StageTracker::new(),
        }
    }

    /// Start a run on a background task, one per host load event
    pub fn launch(self) -> JoinHandle<InstallOutcome> {
        tokio::spawn(async move { self.run().await })
    }

    /// Stage the run is in, or ended in
    pub fn stage(&self) -> InstallStage {
        self.stage.current()
    }

    /// Perform one full run
    ///
    /// Every error is caught here, logged, and shown to the user once.
    pub async fn run(&self) -> InstallOutcome {
        match self.install().await {
            Ok(outcome) => outcome,
            Err(error) => {
                let stage = self.stage.current();
                self.stage.enter(InstallStage::Failed);
                error!(stage = %stage, "Install failed: {}", error);
                self.report_failure(&error).await;
                InstallOutcome::Failed { stage, error }
            }
        }
    }

    async fn report_failure(&self, error: &InstallerError) {
        let config = self.services.config();
        let message = format_error_with_help(error, &config.support_links());
        let title = config.dialog_title.clone();
        let host = Arc::clone(&self.services.host);

        let shown = self
            .main_thread
            .run(move || {
                host.display_dialog(&title, &message);
                Ok(())
            })
            .await;
        if let Err(e) = shown {
            warn!("Could not show the error dialog: {}", e);
        }
    }

    async fn install(&self) -> InstallerResult<InstallOutcome> {
        self.stage.enter(InstallStage::CheckingDevMode);
        if self.services.manifest().has_local_dev_install()? {
            let reason = SkipReason::LocalDevInstall;
            info!("Not running, because {}", reason);
            self.stage.enter(InstallStage::Done);
            return Ok(InstallOutcome::Skipped(reason));
        }

        info!("Starting ...");
        self.stage.enter(InstallStage::CleaningOld);
        let restarting = self.clean_old_install().await?;

        if restarting {
            self.stage.enter(InstallStage::RestartPause);
            let delay = self.services.config().restart_delay();
            // Fixed delay with no readiness check on the host side; if the host
            // takes longer to unload the old package it may still delete the
            // new directory, and the next load repairs it.
            info!(
                delay_secs = delay.as_secs(),
                "Waiting for the host to forget the old package ..."
            );
            tokio::time::sleep(delay).await;
        }

        self.stage.enter(InstallStage::Downloading);
        let url = self.services.config().download_url.clone();
        info!("Downloading {} ...", url);
        let archive_path = with_appended_extension(&self.unique_temp_path().await?, "zip");
        self.services
            .package_client()
            .download_archive(&url, &archive_path)
            .await?;

        self.stage.enter(InstallStage::Extracting);
        info!("Extracting ...");
        let extractor = PackageExtractor::new(self.unique_temp_path().await?);
        let staging_dir = tokio::task::spawn_blocking(move || extractor.extract(&archive_path))
            .await
            .map_err(|e| InstallerError::Unexpected(format!("Extraction task failed: {}", e)))??;

        self.finish_install(staging_dir).await?;

        self.stage.enter(InstallStage::Done);
        info!("Install complete");
        Ok(InstallOutcome::Succeeded {
            restarted: restarting,
        })
    }

    /// Remove the previous install; true if anything was removed
    async fn clean_old_install(&self) -> InstallerResult<bool> {
        let swapper = Arc::clone(&self.swapper);
        let manifest = Arc::clone(&self.services.manifest);
        let host = Arc::clone(&self.services.host);
        let config = Arc::clone(&self.services.config);

        self.main_thread
            .run(move || {
                let mut changed = false;
                changed |= swapper.delete_path(&config.package_archive())?;
                changed |= swapper.delete_path(&config.package_dir())?;
                changed |= manifest.remove_entries(true)?;
                info!("Re-resolving packages ...");
                host.trigger_resolution()?;
                Ok(changed)
            })
            .await
    }

    /// Swap in, clean legacy packages, and re-resolve as one main-thread step
    async fn finish_install(&self, staging_dir: std::path::PathBuf) -> InstallerResult<()> {
        let swapper = Arc::clone(&self.swapper);
        let manifest = Arc::clone(&self.services.manifest);
        let host = Arc::clone(&self.services.host);
        let config = Arc::clone(&self.services.config);
        let stage = self.stage.clone();

        self.main_thread
            .run(move || {
                // Looked up before the swap so only the old copy can match
                let legacy_installer = host.asset_path_for_guid(&config.legacy_installer_guid);

                stage.enter(InstallStage::SwappingIn);
                swapper.swap_in(&staging_dir, &config.package_dir())?;

                stage.enter(InstallStage::CleaningLegacy);
                manifest.remove_entries(false)?;
                if let Some(path) = legacy_installer {
                    swapper.delete_path(&path)?;
                }
                for path in &config.legacy_paths {
                    swapper.delete_path(path)?;
                }

                stage.enter(InstallStage::ReResolving);
                info!("Re-resolving packages ...");
                host.trigger_resolution()
            })
            .await
    }

    async fn unique_temp_path(&self) -> InstallerResult<std::path::PathBuf> {
        let host = Arc::clone(&self.services.host);
        self.main_thread.run(move || host.unique_temp_path()).await
    }
}
