use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};

const APP_DIR_NAME: &str = "Launchpipe";
pub const SETTINGS_FILE: &str = "launcher_settings.json";
pub const DATA_DIR_ENV: &str = "LAUNCHPIPE_DATA_DIR";

pub const DEFAULT_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest.json";
pub const DEFAULT_RESOURCES_URL: &str = "https://resources.download.minecraft.net";
pub const DEFAULT_USER_AGENT: &str = concat!("Launchpipe/", env!("CARGO_PKG_VERSION"));

/// Settings consumed by the pipeline. Every field has a default so a
/// partial settings file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LauncherConfig {
    pub data_dir: PathBuf,
    pub manifest_url: String,
    pub resources_url: String,
    /// Maximum number of parallel transfers.
    pub max_concurrent_downloads: usize,
    pub user_agent: String,
    /// Heap size handed to `-Xmx`.
    pub max_ram: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            manifest_url: DEFAULT_MANIFEST_URL.into(),
            resources_url: DEFAULT_RESOURCES_URL.into(),
            max_concurrent_downloads: 8,
            user_agent: DEFAULT_USER_AGENT.into(),
            max_ram: "4G".into(),
        }
    }
}

impl LauncherConfig {
    /// Load settings from `path`, or defaults when the file does not exist.
    /// The `LAUNCHPIPE_DATA_DIR` environment variable overrides `data_dir`.
    pub fn load(path: &Path) -> LauncherResult<Self> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str::<LauncherConfig>(&raw)
                .map_err(|e| LauncherError::schema(SETTINGS_FILE, e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings at {:?}, using defaults", path);
                LauncherConfig::default()
            }
            Err(e) => return Err(LauncherError::io(path, e)),
        };

        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }

        if config.max_concurrent_downloads == 0 {
            config.max_concurrent_downloads = 1;
        }

        Ok(config)
    }

    /// Load `launcher_settings.json` from the default data directory.
    pub fn load_default() -> LauncherResult<Self> {
        Self::load(&default_data_dir().join(SETTINGS_FILE))
    }

    pub fn save(&self, path: &Path) -> LauncherResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LauncherError::io(parent, e))?;
        }
        std::fs::write(path, json).map_err(|e| LauncherError::io(path, e))
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
