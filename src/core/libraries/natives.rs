use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::error::{LauncherError, LauncherResult};

const NATIVE_EXTENSIONS: [&str; 4] = [".so", ".dll", ".dylib", ".jnilib"];

/// Unpack the shared libraries contained in each native bundle into
/// `natives_dir`, replacing whatever a previous session left there.
///
/// Only top-level entries are extracted; `META-INF/` and nested paths are
/// skipped. Returns the file names written.
pub async fn extract_natives(bundles: &[PathBuf], natives_dir: &Path) -> LauncherResult<Vec<String>> {
    if tokio::fs::try_exists(natives_dir).await.unwrap_or(false) {
        if let Err(e) = tokio::fs::remove_dir_all(natives_dir).await {
            warn!("Could not clear natives directory {:?}: {}", natives_dir, e);
        }
    }
    tokio::fs::create_dir_all(natives_dir)
        .await
        .map_err(|e| LauncherError::io(natives_dir, e))?;

    let mut written = Vec::new();
    for bundle in bundles {
        let bytes = tokio::fs::read(bundle)
            .await
            .map_err(|e| LauncherError::io(bundle, e))?;

        let dest_dir = natives_dir.to_path_buf();
        let bundle_name = bundle.clone();
        let extracted = tokio::task::spawn_blocking(move || extract_bundle(bytes, &dest_dir))
            .await
            .map_err(|e| LauncherError::io(&bundle_name, std::io::Error::other(e)))?;

        match extracted {
            Ok(names) => written.extend(names),
            Err(e) => warn!("Cannot open native bundle {:?}: {}", bundle, e),
        }
    }

    Ok(written)
}

fn extract_bundle(bytes: Vec<u8>, dest_dir: &Path) -> LauncherResult<Vec<String>> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))?;
    let mut written = Vec::new();

    for i in 0..archive.len() {
        let mut file = match archive.by_index(i) {
            Ok(file) => file,
            Err(_) => continue,
        };
        let name = file.name().to_string();

        if name.starts_with("META-INF") || name.contains('/') || name.contains('\\') {
            continue;
        }
        if !NATIVE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
            continue;
        }

        let dest = dest_dir.join(&name);
        let mut out = std::fs::File::create(&dest).map_err(|e| LauncherError::io(&dest, e))?;
        std::io::copy(&mut file, &mut out).map_err(|e| LauncherError::io(&dest, e))?;
        debug!("Extracted native: {}", name);
        written.push(name);
    }

    Ok(written)
}
