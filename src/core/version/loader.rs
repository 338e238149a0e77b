// ─── Metadata Loader ───
// Fetches the catalog, version descriptors and asset indexes, and keeps
// descriptors and indexes on disk so later launches re-read instead of
// re-fetching.

use tracing::{debug, info, warn};

use crate::core::assets::AssetIndex;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::MetadataSource;
use crate::core::layout::GameLayout;
use crate::core::store::{validate_sha1, write_atomic};

use super::manifest::{VersionManifest, VersionSummary};
use super::version_file::{AssetIndexRef, VersionDescriptor};

pub struct MetadataLoader<S> {
    source: S,
    manifest_url: String,
}

impl<S: MetadataSource> MetadataLoader<S> {
    pub fn new(source: S, manifest_url: impl Into<String>) -> Self {
        Self {
            source,
            manifest_url: manifest_url.into(),
        }
    }

    pub async fn fetch_catalog(&self) -> LauncherResult<VersionManifest> {
        info!("Fetching version catalog...");
        let raw = self.source.fetch_text(&self.manifest_url).await?;
        let manifest = VersionManifest::parse(&raw)?;
        info!("Loaded {} versions from catalog", manifest.versions.len());
        Ok(manifest)
    }

    /// Fetch and validate a descriptor. Returns the raw document alongside
    /// so it can be persisted byte-for-byte.
    pub async fn fetch_descriptor(
        &self,
        summary: &VersionSummary,
    ) -> LauncherResult<(VersionDescriptor, String)> {
        debug!("Fetching descriptor for {} from {}", summary.id, summary.url);
        let raw = self.source.fetch_text(&summary.url).await?;
        let descriptor = VersionDescriptor::parse(&raw, &summary.id)?;
        Ok((descriptor, raw))
    }

    pub async fn fetch_asset_index(
        &self,
        index: &AssetIndexRef,
    ) -> LauncherResult<(AssetIndex, String)> {
        debug!("Fetching asset index {} from {}", index.id, index.url);
        let raw = self.source.fetch_text(&index.url).await?;
        let parsed = AssetIndex::parse(&raw)?;
        Ok((parsed, raw))
    }

    /// Resolve a version id through the catalog.
    pub async fn find_version(&self, version_id: &str) -> LauncherResult<VersionSummary> {
        let catalog = self.fetch_catalog().await?;
        catalog
            .find_version(version_id)
            .cloned()
            .ok_or_else(|| LauncherError::VersionNotFound(version_id.to_string()))
    }

    /// Cached descriptor when present, otherwise fetched and persisted to
    /// `versions/<id>/<id>.json`.
    pub async fn load_or_fetch_descriptor(
        &self,
        layout: &GameLayout,
        summary: &VersionSummary,
    ) -> LauncherResult<VersionDescriptor> {
        if let Some(cached) = read_cached_descriptor(layout, &summary.id).await? {
            debug!("Using cached descriptor for {}", summary.id);
            return Ok(cached);
        }

        let (descriptor, raw) = self.fetch_descriptor(summary).await?;
        write_atomic(&layout.descriptor_path(&summary.id), raw.as_bytes()).await?;
        info!("Saved descriptor for {}", summary.id);
        Ok(descriptor)
    }

    /// Cached index when present, otherwise fetched and persisted to
    /// `assets/indexes/<id>.json`. A cached copy that no longer matches the
    /// reference's SHA-1 is replaced.
    pub async fn load_or_fetch_asset_index(
        &self,
        layout: &GameLayout,
        index: &AssetIndexRef,
    ) -> LauncherResult<AssetIndex> {
        let path = layout.asset_index_path(&index.id);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            let trusted = match &index.sha1 {
                Some(expected) => validate_sha1(&path, expected).await?,
                None => true,
            };
            if trusted {
                if let Some(cached) = read_cached_asset_index(layout, &index.id).await? {
                    debug!("Using cached asset index {}", index.id);
                    return Ok(cached);
                }
            } else {
                warn!("Cached asset index {} does not match its SHA-1, refetching", index.id);
            }
        }

        let (parsed, raw) = self.fetch_asset_index(index).await?;
        write_atomic(&path, raw.as_bytes()).await?;
        Ok(parsed)
    }
}

/// Read a previously persisted descriptor. `Ok(None)` when the version has
/// never been fetched.
pub async fn read_cached_descriptor(
    layout: &GameLayout,
    version_id: &str,
) -> LauncherResult<Option<VersionDescriptor>> {
    let path = layout.descriptor_path(version_id);
    match tokio::fs::read_to_string(&path).await {
        Ok(raw) => VersionDescriptor::parse(&raw, version_id).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(LauncherError::io(path, e)),
    }
}

/// Read a previously persisted asset index. `Ok(None)` when it was never
/// fetched.
pub async fn read_cached_asset_index(
    layout: &GameLayout,
    index_id: &str,
) -> LauncherResult<Option<AssetIndex>> {
    let path = layout.asset_index_path(index_id);
    match tokio::fs::read_to_string(&path).await {
        Ok(raw) => AssetIndex::parse(&raw).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(LauncherError::io(path, e)),
    }
}
