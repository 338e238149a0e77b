use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use serde::Deserialize;
use tracing::info;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::layout::GameLayout;
use crate::core::store::{AcquisitionReport, AcquisitionTarget, ContentStore};

/// Top-level asset index JSON structure.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AssetIndex {
    pub objects: HashMap<String, AssetObject>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AssetObject {
    pub hash: String,
    pub size: u64,
}

impl AssetIndex {
    /// Parse an index and reject objects whose hash is not a SHA-1 hex
    /// digest, since the hash determines the on-disk path.
    pub fn parse(raw: &str) -> LauncherResult<Self> {
        let index: AssetIndex = serde_json::from_str(raw)?;
        if let Some((name, obj)) = index.objects.iter().find(|(_, obj)| !is_sha1_hex(&obj.hash)) {
            return Err(LauncherError::schema(
                "asset index",
                format!("object {} has malformed hash {:?}", name, obj.hash),
            ));
        }
        Ok(index)
    }

    /// One target per distinct hash, sorted by hash. Objects sharing a hash
    /// collapse into a single stored file.
    pub fn targets(&self, layout: &GameLayout, resources_url: &str) -> Vec<AcquisitionTarget> {
        self.unique_hashes()
            .into_iter()
            .map(|hash| {
                AcquisitionTarget::new(object_url(resources_url, hash), layout.object_path(hash))
                    .with_sha1(hash)
            })
            .collect()
    }

    /// Stored location of every distinct object, sorted by hash.
    pub fn object_paths(&self, layout: &GameLayout) -> Vec<PathBuf> {
        self.unique_hashes()
            .into_iter()
            .map(|hash| layout.object_path(hash))
            .collect()
    }

    fn unique_hashes(&self) -> BTreeSet<&str> {
        self.objects.values().map(|obj| obj.hash.as_str()).collect()
    }

    pub fn total_size(&self) -> u64 {
        self.objects.values().map(|obj| obj.size).sum()
    }
}

/// `<resources>/<hh>/<hash>`.
pub fn object_url(resources_url: &str, hash: &str) -> String {
    format!(
        "{}/{}/{}",
        resources_url.trim_end_matches('/'),
        &hash[..2.min(hash.len())],
        hash
    )
}

fn is_sha1_hex(hash: &str) -> bool {
    hash.len() == 40 && hash.chars().all(|c| c.is_ascii_hexdigit())
}

/// Acquire every object referenced by `index` into the content-addressed
/// objects tree.
pub async fn download_assets(
    index: &AssetIndex,
    layout: &GameLayout,
    resources_url: &str,
    store: &ContentStore,
) -> AcquisitionReport {
    let targets = index.targets(layout, resources_url);
    info!(
        "Acquiring {} asset objects ({} index entries)",
        targets.len(),
        index.objects.len()
    );

    let report = store.acquire_all(targets).await;
    if !report.is_complete() {
        tracing::warn!("{} asset downloads failed", report.failures.len());
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH_A: &str = "bdf48ef6b5d0d23bbb02e17d04865216179f510a";
    const HASH_B: &str = "0dd9a4a8bd9a6d2a3d2e9d8a8e7f7d2b1e5c3a10";

    fn index() -> AssetIndex {
        AssetIndex::parse(
            &serde_json::json!({
                "objects": {
                    "icons/icon_16x16.png": {"hash": HASH_A, "size": 3665},
                    "icons/copy_of_icon.png": {"hash": HASH_A, "size": 3665},
                    "sounds/ambient/cave/cave1.ogg": {"hash": HASH_B, "size": 100}
                }
            })
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn identical_hashes_collapse_to_one_target() {
        let layout = GameLayout::new("/data/mc");
        let targets = index().targets(&layout, "https://resources.example.com/");

        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].sha1.as_deref(), Some(HASH_B));
        assert_eq!(
            targets[1].source_url,
            format!("https://resources.example.com/bd/{}", HASH_A)
        );
        assert_eq!(targets[1].destination, layout.object_path(HASH_A));
    }

    #[test]
    fn malformed_hash_is_rejected() {
        let raw = r#"{"objects": {"a": {"hash": "zz", "size": 1}}}"#;
        let err = AssetIndex::parse(raw).unwrap_err();
        assert_eq!(err.kind(), crate::core::error::ErrorKind::Schema);
    }

    #[test]
    fn object_paths_are_unique_per_hash() {
        let layout = GameLayout::new("/data/mc");
        assert_eq!(
            index().object_paths(&layout),
            vec![layout.object_path(HASH_B), layout.object_path(HASH_A)]
        );
    }

    #[test]
    fn total_size_counts_every_entry() {
        assert_eq!(index().total_size(), 3665 * 2 + 100);
    }
}
