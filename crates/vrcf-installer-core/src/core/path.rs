use crate::core::error::{InstallerError, InstallerResult};
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Get the project scratch directory (./Temp)
///
/// The host clears this directory on its own schedule; anything staged here
/// may disappear between sessions.
pub fn temp_dir(project_root: &Path) -> PathBuf {
    project_root.join("Temp")
}

/// Resolve a project-relative path against the project root.
///
/// Absolute paths are returned unchanged.
pub fn resolve(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

/// Append an extension to a path without replacing an existing one.
pub fn with_appended_extension(path: &Path, extension: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(".");
    raw.push(extension);
    PathBuf::from(raw)
}

/// Reject paths that would climb out of the project root.
pub fn ensure_relative(path: &Path) -> InstallerResult<()> {
    let escapes = path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
    if escapes {
        return Err(InstallerError::Config(format!(
            "Path must stay inside the project: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> InstallerResult<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
