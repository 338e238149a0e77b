// ─── Version File ───
// Typed schema for a version descriptor, with the legacy argument fallback.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::warn;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::launch::arguments::ArgumentSpec;
use crate::core::rules::{lenient_rules, Rule};

/// Descriptors without `javaVersion` predate the field and ran on Java 8.
pub const DEFAULT_RUNTIME_MAJOR: u32 = 8;

const DOCUMENT: &str = "version descriptor";

/// The descriptor as published, every field optional. Validated into a
/// [`VersionDescriptor`] by [`VersionDescriptor::parse`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionJson {
    id: Option<String>,
    main_class: Option<String>,
    #[serde(rename = "type", default)]
    version_type: Option<String>,
    #[serde(default)]
    inherits_from: Option<String>,
    #[serde(default)]
    libraries: Vec<LibraryEntry>,
    #[serde(default)]
    downloads: Option<VersionDownloads>,
    #[serde(default)]
    asset_index: Option<AssetIndexRef>,
    #[serde(default)]
    arguments: Option<Arguments>,
    /// Legacy `minecraftArguments` field (pre-1.13).
    #[serde(default)]
    minecraft_arguments: Option<String>,
    #[serde(default)]
    java_version: Option<JavaVersionInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JavaVersionInfo {
    major_version: u32,
}

#[derive(Debug, Deserialize)]
struct VersionDownloads {
    client: Option<DownloadArtifact>,
}

#[derive(Debug, Deserialize)]
struct Arguments {
    #[serde(default)]
    game: Vec<ArgumentSpec>,
    #[serde(default)]
    jvm: Option<Vec<ArgumentSpec>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndexRef {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
}

// ─── Library Entry with Rules ───

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LibraryEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
    /// Absent or empty means unconditional.
    #[serde(default, deserialize_with = "lenient_rules")]
    pub rules: Vec<Rule>,
    /// Platform name -> classifier key, e.g. `"natives-windows-${arch}"`.
    #[serde(default)]
    pub natives: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<LibraryArtifact>,
    #[serde(default)]
    pub classifiers: Option<BTreeMap<String, LibraryArtifact>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LibraryArtifact {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

impl LibraryArtifact {
    fn is_usable(&self) -> bool {
        !self.path.trim().is_empty() && !self.url.trim().is_empty()
    }
}

impl LibraryEntry {
    /// The main artifact, if the entry carries usable download metadata.
    pub fn artifact(&self) -> Option<&LibraryArtifact> {
        self.downloads
            .as_ref()?
            .artifact
            .as_ref()
            .filter(|a| a.is_usable())
    }

    pub fn classifier(&self, key: &str) -> Option<&LibraryArtifact> {
        self.downloads
            .as_ref()?
            .classifiers
            .as_ref()?
            .get(key)
            .filter(|a| a.is_usable())
    }

    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        self.artifact().map(|a| a.path.as_str()).unwrap_or("<unnamed>")
    }
}

/// A validated version descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDescriptor {
    pub id: String,
    pub main_class: String,
    /// `release`, `snapshot`, ... as declared by the descriptor itself.
    pub version_type: Option<String>,
    pub required_runtime_major: u32,
    pub asset_index: AssetIndexRef,
    pub client_download: DownloadArtifact,
    pub libraries: Vec<LibraryEntry>,
    /// `None` for legacy descriptors that predate `arguments.jvm`.
    pub jvm_arguments: Option<Vec<ArgumentSpec>>,
    pub program_arguments: Vec<ArgumentSpec>,
}

impl VersionDescriptor {
    /// Parse and validate a descriptor. `expected_id` names the version when
    /// the document itself omits `id`.
    pub fn parse(raw: &str, expected_id: &str) -> LauncherResult<Self> {
        let json: VersionJson = serde_json::from_str(raw)?;

        let id = json
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| expected_id.to_string());

        if let Some(parent) = &json.inherits_from {
            warn!(
                "Version {} inherits from {}; inherited fields are not resolved",
                id, parent
            );
        }

        let main_class = json
            .main_class
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| LauncherError::schema(DOCUMENT, format!("{}: missing mainClass", id)))?;

        let asset_index = json
            .asset_index
            .ok_or_else(|| LauncherError::schema(DOCUMENT, format!("{}: missing assetIndex", id)))?;

        let client_download = json
            .downloads
            .and_then(|d| d.client)
            .ok_or_else(|| {
                LauncherError::schema(DOCUMENT, format!("{}: missing downloads.client", id))
            })?;

        let (jvm_arguments, program_arguments) = match (json.arguments, json.minecraft_arguments)
        {
            (Some(arguments), _) => (arguments.jvm, arguments.game),
            (None, Some(legacy)) => (None, ArgumentSpec::from_legacy(&legacy)),
            (None, None) => {
                return Err(LauncherError::schema(
                    DOCUMENT,
                    format!("{}: neither arguments nor minecraftArguments present", id),
                ))
            }
        };

        Ok(Self {
            id,
            main_class,
            version_type: json.version_type,
            required_runtime_major: json
                .java_version
                .map(|j| j.major_version)
                .unwrap_or(DEFAULT_RUNTIME_MAJOR),
            asset_index,
            client_download,
            libraries: json.libraries,
            jvm_arguments,
            program_arguments,
        })
    }

    pub fn is_legacy(&self) -> bool {
        self.jvm_arguments.is_none()
    }
}
