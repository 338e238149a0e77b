// ─── Launch Preparation ───
// Re-reads an installed version and produces the process invocation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::auth::OfflineAccount;
use crate::core::config::LauncherConfig;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::layout::GameLayout;
use crate::core::libraries;
use crate::core::version::{
    read_cached_asset_index, read_cached_descriptor, VersionDescriptor,
};

use super::arguments::{build_tokens, legacy_jvm_spec, ArgumentSpec};
use super::command::{synthesize, LaunchCommand};
use super::context::LaunchContext;

pub const LAUNCHER_NAME: &str = "launchpipe";
pub const LAUNCHER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const FEATURE_DEMO_USER: &str = "is_demo_user";
pub const FEATURE_CUSTOM_RESOLUTION: &str = "has_custom_resolution";

/// Everything the caller supplies for one launch attempt.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub account: OfflineAccount,
    /// Interpreter binary, provisioned by the caller.
    pub interpreter: PathBuf,
    pub max_ram: String,
    pub resolution: Option<(u32, u32)>,
    pub demo: bool,
    /// Additional feature flags consulted by argument rules.
    pub features: BTreeMap<String, bool>,
    /// Platform/arch used for rule evaluation; variables are filled in by
    /// [`prepare_launch`].
    pub host: LaunchContext,
}

impl LaunchRequest {
    pub fn new(account: OfflineAccount, interpreter: impl Into<PathBuf>) -> Self {
        Self {
            account,
            interpreter: interpreter.into(),
            max_ram: "4G".into(),
            resolution: None,
            demo: false,
            features: BTreeMap::new(),
            host: LaunchContext::for_host(),
        }
    }

    /// Request using the configured heap size.
    pub fn from_config(
        account: OfflineAccount,
        interpreter: impl Into<PathBuf>,
        config: &LauncherConfig,
    ) -> Self {
        Self {
            max_ram: config.max_ram.clone(),
            ..Self::new(account, interpreter)
        }
    }
}

/// Build the invocation for an installed version from its cached
/// descriptor. Fails with `NotInstalled` when no descriptor is cached and
/// with `IncompleteInstall` when any file the install should have produced
/// (classpath jars, native bundles, the asset index or its objects) is
/// missing on disk.
pub async fn prepare_launch(
    layout: &GameLayout,
    version_id: &str,
    request: &LaunchRequest,
) -> LauncherResult<LaunchCommand> {
    let descriptor = read_cached_descriptor(layout, version_id)
        .await?
        .ok_or_else(|| LauncherError::NotInstalled(version_id.to_string()))?;

    let rules_ctx = rule_context(request);
    let planned =
        libraries::plan_libraries(&descriptor.libraries, &rules_ctx, &layout.libraries_dir());
    let classpath = libraries::with_client_jar(
        planned
            .iter()
            .filter_map(|lib| lib.artifact.as_ref().map(|t| t.destination.clone()))
            .collect(),
        layout.client_jar(&descriptor.id),
    );

    let mut required = classpath.clone();
    required.extend(
        planned
            .iter()
            .filter_map(|lib| lib.native.as_ref().map(|t| t.destination.clone())),
    );
    match read_cached_asset_index(layout, &descriptor.asset_index.id).await? {
        Some(index) => required.extend(index.object_paths(layout)),
        None => required.push(layout.asset_index_path(&descriptor.asset_index.id)),
    }

    let mut missing = 0;
    for entry in &required {
        if !tokio::fs::try_exists(entry).await.unwrap_or(false) {
            debug!("Missing installed file: {:?}", entry);
            missing += 1;
        }
    }
    if missing > 0 {
        return Err(LauncherError::IncompleteInstall {
            version: version_id.to_string(),
            failures: missing,
        });
    }

    let ctx = launch_context(layout, &descriptor, request, &rules_ctx, &classpath);
    let command = build_command(&descriptor, &request.interpreter, &ctx);

    info!("Prepared launch of {} ({} tokens)", descriptor.id, command.tokens().len());
    debug!("Command (copy/paste): {}", command);
    Ok(command)
}

/// Run the argument engine over a descriptor and synthesize the command.
pub fn build_command(
    descriptor: &VersionDescriptor,
    interpreter: &Path,
    ctx: &LaunchContext,
) -> LaunchCommand {
    let mut jvm_spec = vec![ArgumentSpec::literal("-Xmx${max_ram}")];
    match &descriptor.jvm_arguments {
        Some(spec) => jvm_spec.extend(spec.iter().cloned()),
        None => jvm_spec.extend(legacy_jvm_spec()),
    }

    let jvm_tokens = build_tokens(&jvm_spec, ctx);
    let program_tokens = build_tokens(&descriptor.program_arguments, ctx);
    synthesize(interpreter, jvm_tokens, &descriptor.main_class, program_tokens)
}

fn rule_context(request: &LaunchRequest) -> LaunchContext {
    request
        .host
        .to_builder()
        .feature(FEATURE_DEMO_USER, request.demo)
        .feature(FEATURE_CUSTOM_RESOLUTION, request.resolution.is_some())
        .features(request.features.iter().map(|(k, v)| (k.clone(), *v)))
        .build()
}

fn launch_context(
    layout: &GameLayout,
    descriptor: &VersionDescriptor,
    request: &LaunchRequest,
    rules_ctx: &LaunchContext,
    classpath: &[PathBuf],
) -> LaunchContext {
    let account = &request.account;
    let assets_dir = layout.assets_dir();

    let mut builder = rules_ctx
        .to_builder()
        .variable("auth_player_name", account.username.as_str())
        .variable("auth_uuid", account.uuid.as_str())
        .variable("auth_access_token", account.access_token.as_str())
        .variable("auth_session", account.access_token.as_str())
        .variable("auth_xuid", account.xuid.as_str())
        .variable("clientid", "")
        .variable("user_type", account.user_type.as_str())
        .variable("user_properties", "{}")
        .variable("version_name", descriptor.id.as_str())
        .variable(
            "version_type",
            descriptor.version_type.as_deref().unwrap_or("release"),
        )
        .variable("game_directory", path_str(layout.root()))
        .variable("assets_root", path_str(&assets_dir))
        .variable("game_assets", path_str(&assets_dir))
        .variable("assets_index_name", descriptor.asset_index.id.as_str())
        .variable("library_directory", path_str(&layout.libraries_dir()))
        .variable("natives_directory", path_str(&layout.natives_dir(&descriptor.id)))
        .variable(
            "classpath",
            libraries::join_classpath(classpath, rules_ctx.platform()),
        )
        .variable(
            "classpath_separator",
            rules_ctx.platform().classpath_separator(),
        )
        .variable("launcher_name", LAUNCHER_NAME)
        .variable("launcher_version", LAUNCHER_VERSION)
        .variable("max_ram", request.max_ram.as_str());

    if let Some((width, height)) = request.resolution {
        builder = builder
            .variable("resolution_width", width.to_string())
            .variable("resolution_height", height.to_string());
    }

    builder.build()
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LaunchRequest {
        let mut account = OfflineAccount::new("Steve");
        account.uuid = "0123456789abcdef0123456789abcdef".into();
        let mut request = LaunchRequest::new(account, "/opt/java/bin/java");
        request.host = LaunchContext::builder()
            .platform("linux")
            .cpu_arch("x86_64")
            .build();
        request
    }

    fn legacy_descriptor() -> VersionDescriptor {
        VersionDescriptor::parse(
            &serde_json::json!({
                "id": "1.8.9",
                "mainClass": "net.minecraft.client.main.Main",
                "assetIndex": {"id": "1.8", "url": "https://example.com/1.8.json"},
                "downloads": {"client": {"url": "https://example.com/client.jar"}},
                "minecraftArguments": "--username ${auth_player_name} --uuid ${auth_uuid} --assetIndex ${assets_index_name}"
            })
            .to_string(),
            "1.8.9",
        )
        .unwrap()
    }

    #[test]
    fn legacy_descriptor_gets_default_jvm_arguments() {
        let layout = GameLayout::new("/mc");
        let descriptor = legacy_descriptor();
        let req = request();
        let rules_ctx = rule_context(&req);
        let classpath = vec![PathBuf::from("/mc/libraries/a.jar"), layout.client_jar("1.8.9")];
        let ctx = launch_context(&layout, &descriptor, &req, &rules_ctx, &classpath);

        let cmd = build_command(&descriptor, &req.interpreter, &ctx);
        assert_eq!(
            cmd.tokens(),
            &[
                "/opt/java/bin/java",
                "-Xmx4G",
                "-Djava.library.path=/mc/versions/1.8.9/natives",
                "-cp",
                "/mc/libraries/a.jar:/mc/versions/1.8.9/1.8.9.jar",
                "net.minecraft.client.main.Main",
                "--username",
                "Steve",
                "--uuid",
                "0123456789abcdef0123456789abcdef",
                "--assetIndex",
                "1.8",
            ]
        );
    }

    #[test]
    fn custom_resolution_sets_feature_and_variables() {
        let mut req = request();
        req.resolution = Some((1280, 720));
        let rules_ctx = rule_context(&req);
        assert_eq!(rules_ctx.feature(FEATURE_CUSTOM_RESOLUTION), Some(true));
        assert_eq!(rules_ctx.feature(FEATURE_DEMO_USER), Some(false));

        let layout = GameLayout::new("/mc");
        let ctx = launch_context(&layout, &legacy_descriptor(), &req, &rules_ctx, &[]);
        assert_eq!(ctx.variable("resolution_width"), Some("1280"));
        assert_eq!(ctx.variable("resolution_height"), Some("720"));
    }

    #[tokio::test]
    async fn uninstalled_version_is_reported_as_not_installed() {
        let layout = GameLayout::new(
            std::env::temp_dir().join(format!("plan-test-none-{}", std::process::id())),
        );
        let err = prepare_launch(&layout, "1.8.9", &request()).await.unwrap_err();
        assert!(matches!(err, LauncherError::NotInstalled(ref id) if id == "1.8.9"));
        assert_eq!(err.to_string(), "Version 1.8.9 is not installed");
    }
}
