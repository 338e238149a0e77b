use std::path::{Path, PathBuf};

/// On-disk roots shared by install and launch.
///
/// ```text
/// <root>/
///   versions/<id>/<id>.json    descriptor, stored raw
///   versions/<id>/<id>.jar     client jar
///   versions/<id>/natives/     extracted native libraries
///   libraries/<artifact path>
///   assets/indexes/<index>.json
///   assets/objects/<hh>/<hash>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLayout {
    root: PathBuf,
}

impl GameLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.root.join("versions")
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.root.join("libraries")
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.assets_dir().join("objects")
    }

    pub fn indexes_dir(&self) -> PathBuf {
        self.assets_dir().join("indexes")
    }

    pub fn version_dir(&self, version_id: &str) -> PathBuf {
        self.versions_dir().join(version_id)
    }

    pub fn descriptor_path(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id)
            .join(format!("{}.json", version_id))
    }

    pub fn client_jar(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id).join(format!("{}.jar", version_id))
    }

    pub fn natives_dir(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id).join("natives")
    }

    pub fn asset_index_path(&self, index_id: &str) -> PathBuf {
        self.indexes_dir().join(format!("{}.json", index_id))
    }

    /// Content-addressed location of an asset object: `objects/<hh>/<hash>`.
    pub fn object_path(&self, hash: &str) -> PathBuf {
        object_path(&self.objects_dir(), hash)
    }
}

/// `objects_root/hash[0:2]/hash`. Hashes shorter than two characters are
/// stored directly under the root.
pub fn object_path(objects_root: &Path, hash: &str) -> PathBuf {
    match hash.get(..2) {
        Some(prefix) => objects_root.join(prefix).join(hash),
        None => objects_root.join(hash),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_is_sharded_by_hash_prefix() {
        let layout = GameLayout::new("/data/mc");
        assert_eq!(
            layout.object_path("bdf48ef6b5d0d23bbb02e17d04865216179f510a"),
            PathBuf::from(
                "/data/mc/assets/objects/bd/bdf48ef6b5d0d23bbb02e17d04865216179f510a"
            )
        );
    }

    #[test]
    fn version_files_live_under_their_id() {
        let layout = GameLayout::new("/data/mc");
        assert_eq!(
            layout.descriptor_path("1.20.1"),
            PathBuf::from("/data/mc/versions/1.20.1/1.20.1.json")
        );
        assert_eq!(
            layout.client_jar("1.20.1"),
            PathBuf::from("/data/mc/versions/1.20.1/1.20.1.jar")
        );
        assert_eq!(
            layout.asset_index_path("5"),
            PathBuf::from("/data/mc/assets/indexes/5.json")
        );
    }
}
