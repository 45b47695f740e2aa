//! Service container for dependency injection

use super::traits::{HostBridge, ManifestStore, PackageClient};
use crate::config::InstallerConfig;
use crate::package::downloader::HttpPackageClient;
use crate::package::manifest::{LineManifestStore, ManifestMarkers};
use std::sync::Arc;

/// Service container for dependency injection
///
/// Holds every collaborator the installer calls through trait objects,
/// plus the shared configuration.
#[derive(Clone)]
pub struct ServiceContainer {
    pub config: Arc<InstallerConfig>,
    pub host: Arc<dyn HostBridge>,
    pub manifest: Arc<dyn ManifestStore>,
    pub package_client: Arc<dyn PackageClient>,
}

impl ServiceContainer {
    /// Create a container with production implementations
    ///
    /// The manifest store reads the manifest under the host's project root
    /// and the package client is a plain HTTP client.
    pub fn new(host: Arc<dyn HostBridge>, config: InstallerConfig) -> Self {
        let client = Arc::new(HttpPackageClient::new());
        Self::with_host_and_client(host, client, config)
    }

    /// Production manifest store with an injected host and transport
    pub fn with_host_and_client(
        host: Arc<dyn HostBridge>,
        package_client: Arc<dyn PackageClient>,
        config: InstallerConfig,
    ) -> Self {
        let manifest = Arc::new(LineManifestStore::new(
            host.project_root().join(&config.manifest_path),
            ManifestMarkers::from_config(&config),
        ));
        Self::with_providers(Arc::new(config), host, manifest, package_client)
    }

    /// Create a service container with custom provider implementations
    pub fn with_providers(
        config: Arc<InstallerConfig>,
        host: Arc<dyn HostBridge>,
        manifest: Arc<dyn ManifestStore>,
        package_client: Arc<dyn PackageClient>,
    ) -> Self {
        Self {
            config,
            host,
            manifest,
            package_client,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &InstallerConfig {
        self.config.as_ref()
    }

    /// Get the host bridge
    pub fn host(&self) -> &dyn HostBridge {
        self.host.as_ref()
    }

    /// Get the manifest store
    pub fn manifest(&self) -> &dyn ManifestStore {
        self.manifest.as_ref()
    }

    /// Get the package client
    pub fn package_client(&self) -> &dyn PackageClient {
        self.package_client.as_ref()
    }
}
