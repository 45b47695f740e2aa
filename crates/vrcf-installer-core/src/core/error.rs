use thiserror::Error;

pub type InstallerResult<T> = Result<T, InstallerError>;

#[derive(Error, Debug)]
pub enum InstallerError {
    /// The package download failed. Carries the URL for context.
    #[error("Failed to download {url}\n{source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Filesystem error: {0}")]
    Filesystem(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Anything the host or runtime raised that fits no other category.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl InstallerError {
    /// True for delete/move/write failures on the manifest or package tree.
    pub fn is_filesystem(&self) -> bool {
        matches!(self, InstallerError::Filesystem(_) | InstallerError::Io(_))
    }
}
