pub mod config;
pub mod core;
pub mod models;
pub mod utils;

use crate::config::default_base_dir;
use crate::core::crash::CrashReporter;
use crate::core::shell::{ConsoleShell, Shell};
use crate::core::startup::Launcher;
use crate::models::paths::AppPaths;
use crate::utils::host::HostInfo;
use crate::utils::logging::init_logging;
use std::sync::Arc;
use tracing::{error, info};

/// Entry point of the desktop binary. Returns once every background task of
/// this run has finished, or right after the shell was shut down because an
/// environment check failed.
pub async fn run() {
    let paths = AppPaths::new(&default_base_dir());
    let _guard = init_logging(&paths.log_dir);
    CrashReporter::new(&paths.crash_dir, HostInfo::collect()).install();

    let shell: Arc<dyn Shell> = Arc::new(ConsoleShell);
    let launcher = Launcher::new(&paths, shell);
    let args: Vec<String> = std::env::args().skip(1).collect();

    let outcome = match launcher.boot(&args) {
        Ok(outcome) => outcome,
        Err(e) => {
            info!("Exiting after failed startup: {e}");
            return;
        }
    };
    info!("Boot finished: {:?}", outcome.decision);

    for task in launcher.on_main_window_ready() {
        if let Err(e) = task.await {
            error!("Background task did not complete: {e}");
        }
    }
    drop(outcome);
}
