pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::core::auth::OfflineAccount;
pub use crate::core::config::LauncherConfig;
pub use crate::core::error::{ErrorKind, LauncherError, LauncherResult};
pub use crate::core::install::{InstallFailure, InstallReport, Installer};
pub use crate::core::launch::{prepare_launch, LaunchCommand, LaunchContext, LaunchRequest};
pub use crate::core::layout::GameLayout;
pub use crate::core::store::ContentStore;

/// Initialize structured logging. `RUST_LOG` overrides the default filter.
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,launchpipe=debug")),
        )
        .try_init();
}
