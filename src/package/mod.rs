pub mod downloader;
pub mod extractor;
pub mod installer;
pub mod manifest;
pub mod swapper;

pub use downloader::HttpPackageClient;
pub use extractor::PackageExtractor;
pub use installer::{InstallOutcome, InstallStage, PackageInstaller, SkipReason};
pub use manifest::{LineManifestStore, ManifestMarkers};
pub use swapper::DirectorySwapper;
