//! Dependency injection infrastructure for the installer
//!
//! The installer only reaches the host, the manifest, and the network
//! through the traits in [`traits`], so tests can swap any of them.
//!
//! # Example (Testing)
//! ```
//! use vrcf_installer::config::InstallerConfig;
//! use vrcf_installer::di::{mocks::*, ServiceContainer};
//! use std::sync::Arc;
//!
//! let host = Arc::new(MockHost::new("/tmp/project"));
//! let client = Arc::new(MockPackageClient::failing());
//! let container = ServiceContainer::with_host_and_client(host, client, InstallerConfig::default());
//! assert_eq!(container.config().main_package, "com.vrcfury.vrcfury");
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

// Re-export key types
pub use container::ServiceContainer;
pub use traits::{HostBridge, ManifestStore, PackageClient};
