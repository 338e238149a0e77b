// ─── Version Manifest ───
// The remote catalog of installable versions.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    Release,
    Snapshot,
    OldBeta,
    OldAlpha,
}

impl VersionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionType::Release => "release",
            VersionType::Snapshot => "snapshot",
            VersionType::OldBeta => "old_beta",
            VersionType::OldAlpha => "old_alpha",
        }
    }
}

/// Top-level catalog document.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionManifest {
    pub latest: LatestVersions,
    pub versions: Vec<VersionSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestVersions {
    pub release: String,
    pub snapshot: String,
}

/// A single entry in the catalog.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct VersionSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: VersionType,
    pub url: String,
    #[serde(rename = "releaseTime", default)]
    pub release_time: Option<DateTime<Utc>>,
}

impl VersionManifest {
    pub fn parse(raw: &str) -> crate::core::error::LauncherResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Find a specific version entry by ID (e.g. "1.20.4").
    pub fn find_version(&self, id: &str) -> Option<&VersionSummary> {
        self.versions.iter().find(|v| v.id == id)
    }

    pub fn latest_release(&self) -> Option<&VersionSummary> {
        self.find_version(&self.latest.release)
    }

    pub fn latest_snapshot(&self) -> Option<&VersionSummary> {
        self.find_version(&self.latest.snapshot)
    }

    /// Entries of one type, in catalog order.
    pub fn of_type(&self, version_type: VersionType) -> Vec<&VersionSummary> {
        self.versions
            .iter()
            .filter(|v| v.version_type == version_type)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "latest": {"release": "1.20.4", "snapshot": "24w03a"},
        "versions": [
            {"id": "24w03a", "type": "snapshot", "url": "https://example.com/24w03a.json",
             "time": "2024-01-17T13:20:00+00:00", "releaseTime": "2024-01-17T13:07:29+00:00"},
            {"id": "1.20.4", "type": "release", "url": "https://example.com/1.20.4.json",
             "releaseTime": "2023-12-07T12:56:20+00:00"},
            {"id": "b1.7.3", "type": "old_beta", "url": "https://example.com/b1.7.3.json"},
            {"id": "a1.0.4", "type": "old_alpha", "url": "https://example.com/a1.0.4.json"}
        ]
    }"#;

    #[test]
    fn deserialize_catalog() {
        let manifest = VersionManifest::parse(CATALOG).unwrap();
        assert_eq!(manifest.versions.len(), 4);
        assert_eq!(manifest.latest_release().unwrap().id, "1.20.4");
        assert_eq!(manifest.latest_snapshot().unwrap().version_type, VersionType::Snapshot);

        let release = manifest.find_version("1.20.4").unwrap();
        assert_eq!(
            release.release_time.unwrap().to_rfc3339(),
            "2023-12-07T12:56:20+00:00"
        );
        assert!(manifest.find_version("b1.7.3").unwrap().release_time.is_none());
    }

    #[test]
    fn filter_by_type_keeps_catalog_order() {
        let manifest = VersionManifest::parse(CATALOG).unwrap();
        let ids: Vec<_> = manifest
            .of_type(VersionType::OldAlpha)
            .iter()
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a1.0.4"]);
        assert_eq!(VersionType::OldBeta.as_str(), "old_beta");
    }

    #[test]
    fn unknown_version_type_is_rejected() {
        let raw = r#"{"latest": {"release": "x", "snapshot": "x"},
                      "versions": [{"id": "x", "type": "experiment", "url": "u"}]}"#;
        assert!(VersionManifest::parse(raw).is_err());
    }
}
