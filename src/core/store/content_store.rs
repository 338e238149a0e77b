use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use reqwest::Client;
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{LauncherError, LauncherResult};

/// Progress of a single transfer, reported per received chunk.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TransferProgress {
    pub url: String,
    pub bytes_so_far: u64,
    pub total_bytes: Option<u64>,
}

pub type ProgressCallback = Arc<dyn Fn(&TransferProgress) + Send + Sync>;

/// One file to acquire: where it comes from, where it goes, and the SHA-1
/// its bytes must hash to when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionTarget {
    pub source_url: String,
    pub destination: PathBuf,
    pub sha1: Option<String>,
}

impl AcquisitionTarget {
    pub fn new(source_url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source_url: source_url.into(),
            destination: destination.into(),
            sha1: None,
        }
    }

    pub fn with_sha1(mut self, sha1: impl Into<String>) -> Self {
        self.sha1 = Some(sha1.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    /// Destination already existed; nothing was fetched.
    AlreadyPresent,
    Fetched { bytes: u64 },
}

#[derive(Debug)]
pub struct AcquisitionFailure {
    pub target: AcquisitionTarget,
    pub error: LauncherError,
}

/// Outcome of a best-effort sweep over many targets.
#[derive(Debug, Default)]
pub struct AcquisitionReport {
    pub fetched: usize,
    pub already_present: usize,
    pub failures: Vec<AcquisitionFailure>,
}

impl AcquisitionReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Idempotent, hash-verified file acquisition.
///
/// Fresh bytes are streamed into a sibling temporary file and renamed into
/// place only after verification, so a destination path is either absent
/// or complete.
pub struct ContentStore {
    client: Client,
    /// Maximum number of parallel transfers.
    concurrency: usize,
    progress: Option<ProgressCallback>,
    cancelled: Arc<AtomicBool>,
    bytes_fetched: AtomicU64,
    requests: AtomicUsize,
}

impl ContentStore {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            concurrency: 8,
            progress: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            bytes_fetched: AtomicU64::new(0),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Stop starting new transfers. Transfers already in flight finish.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Shared flag another task can set to cancel this store.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Total bytes written by fresh fetches so far.
    pub fn bytes_fetched(&self) -> u64 {
        self.bytes_fetched.load(Ordering::Relaxed)
    }

    /// Number of network requests issued so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    // ── Single target ───────────────────────────────────

    pub async fn acquire(&self, target: &AcquisitionTarget) -> LauncherResult<Acquisition> {
        if self.is_cancelled() {
            return Err(LauncherError::Cancelled);
        }

        let dest = &target.destination;
        if tokio::fs::try_exists(dest).await.unwrap_or(false) {
            return Ok(Acquisition::AlreadyPresent);
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::io(parent, e))?;
        }

        let temp = temp_path_for(dest);
        let bytes = match self.fetch_into(target, &temp).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = tokio::fs::remove_file(&temp).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&temp, dest).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(LauncherError::io(dest, e));
        }

        self.bytes_fetched.fetch_add(bytes, Ordering::Relaxed);
        debug!("Acquired: {} -> {:?}", target.source_url, dest);
        Ok(Acquisition::Fetched { bytes })
    }

    async fn fetch_into(&self, target: &AcquisitionTarget, temp: &Path) -> LauncherResult<u64> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let url = target.source_url.as_str();
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total_bytes = response.content_length();
        let mut hasher = Sha1::new();
        let mut bytes_so_far = 0u64;

        // Keep the handle scoped so it is closed before the rename.
        {
            let mut file = tokio::fs::File::create(temp)
                .await
                .map_err(|e| LauncherError::io(temp, e))?;

            let mut body = response.bytes_stream();
            while let Some(chunk) = body.next().await {
                let chunk = chunk?;
                hasher.update(&chunk);
                file.write_all(&chunk)
                    .await
                    .map_err(|e| LauncherError::io(temp, e))?;
                bytes_so_far += chunk.len() as u64;

                if let Some(progress) = &self.progress {
                    progress(&TransferProgress {
                        url: url.to_string(),
                        bytes_so_far,
                        total_bytes,
                    });
                }
            }

            file.flush().await.map_err(|e| LauncherError::io(temp, e))?;
        }

        if let Some(expected) = &target.sha1 {
            let actual = hex::encode(hasher.finalize());
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(LauncherError::IntegrityMismatch {
                    path: target.destination.clone(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        Ok(bytes_so_far)
    }

    // ── Batch ───────────────────────────────────────────

    /// Acquire every target with bounded parallelism. Results come back in
    /// the same order as `targets`.
    pub async fn acquire_each(
        &self,
        targets: &[AcquisitionTarget],
    ) -> Vec<LauncherResult<Acquisition>> {
        stream::iter(targets)
            .map(|target| self.acquire(target))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Best-effort sweep: every target is attempted and failures are
    /// collected rather than aborting the batch.
    pub async fn acquire_all(&self, targets: Vec<AcquisitionTarget>) -> AcquisitionReport {
        info!(
            "Starting acquisition: {} files, concurrency={}",
            targets.len(),
            self.concurrency
        );

        let results = self.acquire_each(&targets).await;
        let mut report = AcquisitionReport::default();

        for (target, result) in targets.into_iter().zip(results) {
            match result {
                Ok(Acquisition::AlreadyPresent) => report.already_present += 1,
                Ok(Acquisition::Fetched { .. }) => report.fetched += 1,
                Err(error) => {
                    warn!("Failed to acquire {}: {}", target.source_url, error);
                    report.failures.push(AcquisitionFailure { target, error });
                }
            }
        }

        info!(
            "Acquisition finished: {} fetched, {} cached, {} failed",
            report.fetched,
            report.already_present,
            report.failures.len()
        );
        report
    }
}

/// Validate an existing file's SHA-1.
pub async fn validate_sha1(path: &Path, expected: &str) -> LauncherResult<bool> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| LauncherError::io(path, e))?;
    let mut hasher = Sha1::new();
    hasher.update(&bytes);
    let actual = hex::encode(hasher.finalize());
    Ok(actual.eq_ignore_ascii_case(expected))
}

/// Write `contents` to `path` through a temporary sibling and a rename.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> LauncherResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| LauncherError::io(parent, e))?;
    }

    let temp = temp_path_for(path);
    if let Err(e) = tokio::fs::write(&temp, contents).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(LauncherError::io(&temp, e));
    }
    if let Err(e) = tokio::fs::rename(&temp, path).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(LauncherError::io(path, e));
    }
    Ok(())
}

/// Unique per attempt so concurrent writers of one destination never share
/// a temporary file.
fn temp_path_for(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    dest.with_file_name(format!(".{}.{}.part", name, Uuid::new_v4().simple()))
}
