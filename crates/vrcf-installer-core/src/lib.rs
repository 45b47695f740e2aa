//! Core utilities shared by the VRCFury installer: the error type,
//! user-facing error help, and project layout helpers.

pub mod core;

pub use core::error::{InstallerError, InstallerResult};
pub use core::error_help::{format_error_with_help, ErrorHelp, SupportLinks};
