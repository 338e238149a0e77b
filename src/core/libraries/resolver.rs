// ─── Library Resolver ───
// Filters library entries by rules, acquires their artifacts, and builds an
// ordered classpath.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::error::LauncherError;
use crate::core::launch::context::{LaunchContext, Platform};
use crate::core::rules;
use crate::core::store::{AcquisitionTarget, ContentStore};
use crate::core::version::{LibraryArtifact, LibraryEntry};

#[derive(Debug)]
pub struct LibraryFailure {
    pub library: String,
    pub error: LauncherError,
}

/// Result of resolving a descriptor's libraries for one context.
#[derive(Debug, Default)]
pub struct LibraryResolution {
    /// Local artifact paths in declaration order.
    pub classpath: Vec<PathBuf>,
    /// Native bundles (archives of shared libraries); never on the classpath.
    pub natives: Vec<PathBuf>,
    pub failures: Vec<LibraryFailure>,
}

impl LibraryResolution {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A library that passed its rules, with the files it contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLibrary {
    pub name: String,
    pub artifact: Option<AcquisitionTarget>,
    pub native: Option<AcquisitionTarget>,
}

/// Pure filtering step: which entries apply to `ctx`, and where their files
/// live under `libs_dir`. Declaration order is preserved.
pub fn plan_libraries(
    libraries: &[LibraryEntry],
    ctx: &LaunchContext,
    libs_dir: &Path,
) -> Vec<PlannedLibrary> {
    libraries
        .iter()
        .filter(|lib| {
            let allowed = rules::evaluate(&lib.rules, ctx);
            if !allowed {
                debug!("Skipping library (rules): {}", lib.display_name());
            }
            allowed
        })
        .map(|lib| PlannedLibrary {
            name: lib.display_name().to_string(),
            artifact: lib.artifact().map(|a| target_for(a, libs_dir)),
            native: native_artifact(lib, ctx).map(|a| target_for(a, libs_dir)),
        })
        .filter(|planned| planned.artifact.is_some() || planned.native.is_some())
        .collect()
}

/// Classpath for `ctx` without touching disk or network.
pub fn classpath(libraries: &[LibraryEntry], ctx: &LaunchContext, libs_dir: &Path) -> Vec<PathBuf> {
    plan_libraries(libraries, ctx, libs_dir)
        .into_iter()
        .filter_map(|planned| planned.artifact.map(|t| t.destination))
        .collect()
}

/// Append the client jar, which always comes last.
pub fn with_client_jar(mut classpath: Vec<PathBuf>, client_jar: PathBuf) -> Vec<PathBuf> {
    classpath.push(client_jar);
    classpath
}

/// Join entries with the platform's separator.
pub fn join_classpath(entries: &[PathBuf], platform: Platform) -> String {
    entries
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join(platform.classpath_separator())
}

/// Resolve and acquire every applicable library. Failures are collected per
/// library; the remaining libraries are still attempted and successful
/// entries keep their declared position.
pub async fn resolve(
    libraries: &[LibraryEntry],
    ctx: &LaunchContext,
    libs_dir: &Path,
    store: &ContentStore,
) -> LibraryResolution {
    let planned = plan_libraries(libraries, ctx, libs_dir);

    let mut jobs: Vec<(usize, bool)> = Vec::new();
    let mut targets = Vec::new();
    for (idx, lib) in planned.iter().enumerate() {
        if let Some(target) = &lib.artifact {
            jobs.push((idx, false));
            targets.push(target.clone());
        }
        if let Some(target) = &lib.native {
            jobs.push((idx, true));
            targets.push(target.clone());
        }
    }

    let results = store.acquire_each(&targets).await;

    let mut resolution = LibraryResolution::default();
    for (((idx, is_native), target), result) in jobs.into_iter().zip(targets).zip(results) {
        match result {
            Ok(_) if is_native => resolution.natives.push(target.destination),
            Ok(_) => resolution.classpath.push(target.destination),
            Err(error) => {
                warn!("Library {} failed: {}", planned[idx].name, error);
                resolution.failures.push(LibraryFailure {
                    library: planned[idx].name.clone(),
                    error,
                });
            }
        }
    }

    info!(
        "Processed {} libraries ({} on classpath, {} native bundles, {} failed)",
        libraries.len(),
        resolution.classpath.len(),
        resolution.natives.len(),
        resolution.failures.len()
    );
    resolution
}

fn target_for(artifact: &LibraryArtifact, libs_dir: &Path) -> AcquisitionTarget {
    let target = AcquisitionTarget::new(artifact.url.clone(), libs_dir.join(&artifact.path));
    match &artifact.sha1 {
        Some(sha1) => target.with_sha1(sha1.clone()),
        None => target,
    }
}

/// The native classifier artifact for the context's platform, with
/// `${arch}` replaced by the context's bitness.
fn native_artifact<'a>(lib: &'a LibraryEntry, ctx: &LaunchContext) -> Option<&'a LibraryArtifact> {
    let natives = lib.natives.as_ref()?;
    let key = natives
        .get(ctx.platform().as_str())?
        .replace("${arch}", ctx.arch_bits());
    lib.classifier(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::Rule;

    fn lib(name: &str) -> LibraryEntry {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "downloads": {"artifact": {
                "path": format!("{}.jar", name),
                "url": format!("https://libraries.example.com/{}.jar", name)
            }}
        }))
        .unwrap()
    }

    fn linux() -> LaunchContext {
        LaunchContext::builder()
            .platform("linux")
            .cpu_arch("x86_64")
            .build()
    }

    #[test]
    fn classpath_keeps_declaration_order_and_client_last() {
        let libs = vec![lib("a"), lib("b"), lib("c")];
        let dir = Path::new("/libs");
        let cp = with_client_jar(
            classpath(&libs, &linux(), dir),
            PathBuf::from("/versions/z/z.jar"),
        );

        assert_eq!(
            cp,
            vec![
                PathBuf::from("/libs/a.jar"),
                PathBuf::from("/libs/b.jar"),
                PathBuf::from("/libs/c.jar"),
                PathBuf::from("/versions/z/z.jar"),
            ]
        );
    }

    #[test]
    fn rejected_and_metadata_less_entries_are_skipped() {
        let mut mac_only = lib("mac");
        mac_only.rules = vec![Rule::allow().on_os("osx")];
        let bare: LibraryEntry =
            serde_json::from_value(serde_json::json!({"name": "bare:lib:1"})).unwrap();

        let libs = vec![lib("a"), mac_only, bare, lib("b")];
        let cp = classpath(&libs, &linux(), Path::new("/libs"));

        assert_eq!(
            cp,
            vec![PathBuf::from("/libs/a.jar"), PathBuf::from("/libs/b.jar")]
        );
    }

    #[test]
    fn native_classifier_uses_platform_and_bitness() {
        let native: LibraryEntry = serde_json::from_value(serde_json::json!({
            "name": "org.lwjgl.lwjgl:lwjgl-platform:2.9.4",
            "natives": {"linux": "natives-linux", "windows": "natives-windows-${arch}"},
            "downloads": {"classifiers": {
                "natives-linux": {"path": "n/linux.jar", "url": "https://e.com/l.jar", "sha1": "aa"},
                "natives-windows-64": {"path": "n/win64.jar", "url": "https://e.com/w.jar"}
            }}
        }))
        .unwrap();

        let planned = plan_libraries(std::slice::from_ref(&native), &linux(), Path::new("/libs"));
        assert_eq!(planned.len(), 1);
        assert!(planned[0].artifact.is_none());
        let target = planned[0].native.as_ref().unwrap();
        assert_eq!(target.destination, PathBuf::from("/libs/n/linux.jar"));
        assert_eq!(target.sha1.as_deref(), Some("aa"));

        let windows = LaunchContext::builder()
            .platform("windows")
            .cpu_arch("x86_64")
            .build();
        let planned = plan_libraries(&[native], &windows, Path::new("/libs"));
        assert_eq!(
            planned[0].native.as_ref().unwrap().destination,
            PathBuf::from("/libs/n/win64.jar")
        );
    }

    #[test]
    fn join_uses_platform_separator() {
        let entries = vec![PathBuf::from("/a.jar"), PathBuf::from("/b.jar")];
        assert_eq!(join_classpath(&entries, Platform::Linux), "/a.jar:/b.jar");
        assert_eq!(join_classpath(&entries, Platform::Windows), "/a.jar;/b.jar");
    }

    #[tokio::test]
    async fn resolve_uses_cached_artifacts_without_fetching() {
        let dir = std::env::temp_dir().join(format!("resolver-test-cached-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["a", "b"] {
            std::fs::write(dir.join(format!("{}.jar", name)), b"jar").unwrap();
        }

        let store = ContentStore::new(reqwest::Client::new());
        let resolution = resolve(&[lib("a"), lib("b")], &linux(), &dir, &store).await;

        assert!(resolution.is_complete());
        assert_eq!(resolution.classpath, vec![dir.join("a.jar"), dir.join("b.jar")]);
        assert_eq!(store.request_count(), 0);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
