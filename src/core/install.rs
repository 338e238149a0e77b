// ─── Install Pipeline ───
// catalog -> descriptor -> client jar + libraries -> asset index -> assets.

use std::path::PathBuf;

use reqwest::Client;
use tracing::{info, warn};

use crate::core::assets;
use crate::core::config::LauncherConfig;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::{build_http_client, MetadataSource};
use crate::core::launch::context::LaunchContext;
use crate::core::layout::GameLayout;
use crate::core::libraries::{self, extract_natives};
use crate::core::store::{AcquisitionTarget, ContentStore};
use crate::core::version::{MetadataLoader, VersionDescriptor};

/// A file the install could not acquire.
#[derive(Debug)]
pub struct InstallFailure {
    pub target: String,
    pub error: LauncherError,
}

#[derive(Debug)]
pub struct InstallReport {
    pub descriptor: VersionDescriptor,
    /// Acquired classpath, client jar last. Entries whose acquisition failed
    /// are absent.
    pub classpath: Vec<PathBuf>,
    pub natives: Vec<PathBuf>,
    pub assets_fetched: usize,
    pub assets_cached: usize,
    pub failures: Vec<InstallFailure>,
}

impl InstallReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Err(IncompleteInstall)` when anything failed to acquire.
    pub fn into_result(self) -> LauncherResult<Self> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(LauncherError::IncompleteInstall {
                version: self.descriptor.id.clone(),
                failures: self.failures.len(),
            })
        }
    }
}

pub struct Installer<S> {
    loader: MetadataLoader<S>,
    store: ContentStore,
    layout: GameLayout,
    resources_url: String,
}

impl Installer<Client> {
    /// Installer wired from settings: one HTTP client shared by metadata
    /// fetches and the content store.
    pub fn from_config(config: &LauncherConfig) -> LauncherResult<Self> {
        let client = build_http_client(config)?;
        let store = ContentStore::new(client.clone())
            .with_concurrency(config.max_concurrent_downloads);
        Ok(Self::new(
            MetadataLoader::new(client, config.manifest_url.clone()),
            store,
            GameLayout::new(config.data_dir.clone()),
            config.resources_url.clone(),
        ))
    }
}

impl<S: MetadataSource> Installer<S> {
    pub fn new(
        loader: MetadataLoader<S>,
        store: ContentStore,
        layout: GameLayout,
        resources_url: impl Into<String>,
    ) -> Self {
        Self {
            loader,
            store,
            layout,
            resources_url: resources_url.into(),
        }
    }

    pub fn layout(&self) -> &GameLayout {
        &self.layout
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn loader(&self) -> &MetadataLoader<S> {
        &self.loader
    }

    /// Install `version_id` for the platform described by `ctx`.
    ///
    /// Catalog, descriptor and asset-index failures abort immediately. File
    /// acquisition and native extraction are best-effort; their failures are
    /// collected in the report.
    pub async fn install(
        &self,
        version_id: &str,
        ctx: &LaunchContext,
    ) -> LauncherResult<InstallReport> {
        info!("Installing {}", version_id);

        let summary = self.loader.find_version(version_id).await?;
        let descriptor = self
            .loader
            .load_or_fetch_descriptor(&self.layout, &summary)
            .await?;

        let mut failures = Vec::new();

        let libs = libraries::resolve(
            &descriptor.libraries,
            ctx,
            &self.layout.libraries_dir(),
            &self.store,
        )
        .await;
        failures.extend(libs.failures.into_iter().map(|f| InstallFailure {
            target: f.library,
            error: f.error,
        }));

        let client_jar = self.layout.client_jar(&descriptor.id);
        let mut client_target =
            AcquisitionTarget::new(descriptor.client_download.url.clone(), client_jar.clone());
        client_target.sha1 = descriptor.client_download.sha1.clone();

        let mut classpath = libs.classpath;
        match self.store.acquire(&client_target).await {
            Ok(_) => classpath.push(client_jar),
            Err(error) => {
                warn!("Client jar for {} failed: {}", descriptor.id, error);
                failures.push(InstallFailure {
                    target: client_target.source_url,
                    error,
                });
            }
        }

        if !libs.natives.is_empty() {
            let natives_dir = self.layout.natives_dir(&descriptor.id);
            match extract_natives(&libs.natives, &natives_dir).await {
                Ok(extracted) => info!("Extracted {} native libraries", extracted.len()),
                Err(error) => {
                    warn!("Native extraction for {} failed: {}", descriptor.id, error);
                    failures.push(InstallFailure {
                        target: natives_dir.to_string_lossy().to_string(),
                        error,
                    });
                }
            }
        }

        let index = self
            .loader
            .load_or_fetch_asset_index(&self.layout, &descriptor.asset_index)
            .await?;
        let asset_report =
            assets::download_assets(&index, &self.layout, &self.resources_url, &self.store).await;
        failures.extend(asset_report.failures.into_iter().map(|f| InstallFailure {
            target: f.target.source_url,
            error: f.error,
        }));

        if failures.is_empty() {
            info!("{} installed successfully", descriptor.id);
        } else {
            warn!(
                "{} is not fully installed: {} files failed",
                descriptor.id,
                failures.len()
            );
        }

        Ok(InstallReport {
            descriptor,
            classpath,
            natives: libs.natives,
            assets_fetched: asset_report.fetched,
            assets_cached: asset_report.already_present,
            failures,
        })
    }
}
