use std::io::{BufRead, Write};
use tracing::{error, info, warn};

/// Windows the core asks the presentation layer to bring up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    /// Interactive account selection.
    AccountPicker,
    /// Authenticated load flow that resumes a stored session.
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

/// Signals consumed by the windowing layer. Implementations must be callable
/// from background tasks.
pub trait Shell: Send + Sync {
    fn warn(&self, title: &str, message: &str);
    fn error(&self, title: &str, message: &str);
    /// OK/Cancel prompt, `true` on OK.
    fn confirm(&self, title: &str, message: &str) -> bool;
    fn open_link(&self, url: &str);
    fn show_window(&self, window: WindowKind);
    fn notify(&self, notice: Notice);
    /// Persistent "new version" affordance on the main window.
    fn show_update_badge(&self, text: &str);
    fn shutdown(&self);
}

/// Headless shell for terminals: messages go to stderr, prompts read stdin.
pub struct ConsoleShell;

impl Shell for ConsoleShell {
    fn warn(&self, title: &str, message: &str) {
        eprintln!("[{title}] {message}");
    }

    fn error(&self, title: &str, message: &str) {
        eprintln!("[{title}] {message}");
    }

    fn confirm(&self, title: &str, message: &str) -> bool {
        eprint!("[{title}] {message} [y/N] ");
        let _ = std::io::stderr().flush();
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(_) => line.trim().eq_ignore_ascii_case("y"),
            Err(_) => false,
        }
    }

    fn open_link(&self, url: &str) {
        if let Err(err) = open::that(url) {
            warn!("Could not open {url} automatically: {err:?}");
        }
    }

    fn show_window(&self, window: WindowKind) {
        info!("Showing window {window:?}");
    }

    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Info(m) => info!("{m}"),
            Notice::Warning(m) => warn!("{m}"),
            Notice::Error(m) => error!("{m}"),
        }
    }

    fn show_update_badge(&self, text: &str) {
        eprintln!("* {text}");
    }

    fn shutdown(&self) {
        info!("Shutdown requested");
    }
}
