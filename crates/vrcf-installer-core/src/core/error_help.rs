//! Turns installer errors into the single message shown to the user.

use crate::core::error::InstallerError;

/// Where users are sent when an install fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportLinks {
    pub download_page: String,
    pub support_channel: String,
}

impl Default for SupportLinks {
    fn default() -> Self {
        Self {
            download_page: "https://vrcfury.com/download".to_string(),
            support_channel: "https://vrcfury.com/discord".to_string(),
        }
    }
}

/// Remediation hints attached to an error.
pub trait ErrorHelp {
    fn help(&self) -> Option<&'static str>;
}

impl ErrorHelp for InstallerError {
    fn help(&self) -> Option<&'static str> {
        match self {
            InstallerError::Network { .. } => {
                Some("Check your internet connection, then reopen the project to retry.")
            }
            InstallerError::Archive(_) => {
                Some("The downloaded package was damaged. Reopen the project to download it again.")
            }
            InstallerError::Filesystem(_) | InstallerError::Io(_) => Some(
                "Close any program that may be using the project's Packages folder, then reopen the project.",
            ),
            InstallerError::Config(_) | InstallerError::Yaml(_) => {
                Some("Check the installer configuration file.")
            }
            InstallerError::Unexpected(_) => None,
        }
    }
}

/// Build the user-facing failure message.
pub fn format_error_with_help(error: &InstallerError, links: &SupportLinks) -> String {
    let mut message = format!(
        "VRCFury encountered an error while installing. \
         If the issue repeats, try re-downloading from {} or ask on the discord: {}\n\n{}",
        links.download_page, links.support_channel, error
    );
    if let Some(help) = error.help() {
        message.push_str("\n\n");
        message.push_str(help);
    }
    message.push_str("\nCheck the log for details.");
    message
}
