pub mod loader;
pub mod manifest;
pub mod version_file;

pub use loader::{read_cached_asset_index, read_cached_descriptor, MetadataLoader};
pub use manifest::{LatestVersions, VersionManifest, VersionSummary, VersionType};
pub use version_file::{
    AssetIndexRef, DownloadArtifact, LibraryArtifact, LibraryDownloads, LibraryEntry,
    VersionDescriptor, DEFAULT_RUNTIME_MAJOR,
};
