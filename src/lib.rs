//! Self-updating installer for the VRCFury package
//!
//! On each host load the installer fetches the latest package zip, removes
//! the previous install and obsolete companion packages, swaps the new
//! package into place, and asks the host to re-resolve its packages.
//!
//! The host is reached only through [`di::HostBridge`], and anything that
//! touches live host state runs on the host's main thread via
//! [`dispatch::MainThread`].

pub use vrcf_installer_core::{
    format_error_with_help, ErrorHelp, InstallerError, InstallerResult, SupportLinks,
};

/// Core module re-exported from vrcf-installer-core.
pub mod core {
    pub use vrcf_installer_core::core::{error, error_help, path};
    pub use vrcf_installer_core::{
        format_error_with_help, ErrorHelp, InstallerError, InstallerResult, SupportLinks,
    };
}

/// Installer configuration.
pub mod config;

/// Dependency injection infrastructure.
pub mod di;

/// Main-thread work queue.
pub mod dispatch;

/// Headless host bridge.
pub mod host;

/// Package install workflow (manifest, download, extract, swap).
pub mod package;
