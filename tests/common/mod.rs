#![allow(dead_code)]

use camino::Utf8PathBuf;
use ea_desktop_emu_lib::config::{ConfigStore, MemoryStore};
use ea_desktop_emu_lib::core::game::GameLauncher;
use ea_desktop_emu_lib::core::gate::{EnvironmentGate, PortProbe, ProcessIdentity, WebRuntimeProbe};
use ea_desktop_emu_lib::core::shell::{Notice, Shell, WindowKind};
use ea_desktop_emu_lib::core::startup::Launcher;
use ea_desktop_emu_lib::models::error::SError;
use ea_desktop_emu_lib::models::game::GameType;
use ea_desktop_emu_lib::models::paths::AppPaths;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Isolated data root for one launcher run.
pub fn setup_test_env() -> (TempDir, AppPaths) {
    let tmp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
    (tmp, AppPaths::new(&root))
}

/// Config store seeded with `Globals` entries.
pub fn globals(entries: &[(&str, &str)]) -> Box<dyn ConfigStore> {
    let mut store = MemoryStore::default();
    for (key, value) in entries {
        store.set("Globals", key, value);
    }
    Box::new(store)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Warn(String),
    Error(String),
    Confirm(String),
    OpenLink(String),
    Window(WindowKind),
    Notice(Notice),
    Badge(String),
    Shutdown,
}

/// Records every call; `confirm` answers with the configured value.
#[derive(Default)]
pub struct RecordingShell {
    pub events: Mutex<Vec<ShellEvent>>,
    pub confirm_answer: bool,
}

impl RecordingShell {
    pub fn events(&self) -> Vec<ShellEvent> {
        self.events.lock().clone()
    }

    pub fn windows(&self) -> Vec<WindowKind> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ShellEvent::Window(w) => Some(w),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ShellEvent) {
        self.events.lock().push(event);
    }
}

impl Shell for RecordingShell {
    fn warn(&self, _: &str, message: &str) {
        self.push(ShellEvent::Warn(message.into()));
    }

    fn error(&self, _: &str, message: &str) {
        self.push(ShellEvent::Error(message.into()));
    }

    fn confirm(&self, _: &str, message: &str) -> bool {
        self.push(ShellEvent::Confirm(message.into()));
        self.confirm_answer
    }

    fn open_link(&self, url: &str) {
        self.push(ShellEvent::OpenLink(url.into()));
    }

    fn show_window(&self, window: WindowKind) {
        self.push(ShellEvent::Window(window));
    }

    fn notify(&self, notice: Notice) {
        self.push(ShellEvent::Notice(notice));
    }

    fn show_update_badge(&self, text: &str) {
        self.push(ShellEvent::Badge(text.into()));
    }

    fn shutdown(&self) {
        self.push(ShellEvent::Shutdown);
    }
}

pub struct Runtime(pub bool);

impl WebRuntimeProbe for Runtime {
    fn is_installed(&self) -> bool {
        self.0
    }
}

pub struct Ports(pub Vec<u16>);

impl PortProbe for Ports {
    fn is_listening(&self, port: u16) -> bool {
        self.0.contains(&port)
    }
}

/// Identity probe that remembers whether it was consulted.
pub struct TrackedIdentity {
    pub name: &'static str,
    pub consulted: Arc<AtomicBool>,
}

impl ProcessIdentity for TrackedIdentity {
    fn current_name(&self) -> Option<String> {
        self.consulted.store(true, Ordering::SeqCst);
        Some(self.name.to_string())
    }
}

/// Gate with every probe passing and the host check enabled.
pub fn passing_gate(paths: &AppPaths) -> EnvironmentGate {
    EnvironmentGate::new(&paths.lock_file)
        .with_runtime_probe(Runtime(true))
        .with_port_probe(Ports(vec![]))
        .with_identity(TrackedIdentity {
            name: "EADesktop.exe",
            consulted: Arc::new(AtomicBool::new(false)),
        })
        .with_expected_host(Some("EADesktop".into()))
}

#[derive(Default)]
pub struct FakeGames {
    pub installed: Vec<GameType>,
    pub launched: Mutex<Vec<GameType>>,
}

impl GameLauncher for FakeGames {
    fn is_installed(&self, game: GameType) -> bool {
        self.installed.contains(&game)
    }

    fn launch(&self, game: GameType) -> Result<(), SError> {
        self.launched.lock().push(game);
        Ok(())
    }
}

/// Launcher wired to fakes only: English strings, no update endpoint, no delays.
pub fn test_launcher(paths: &AppPaths, shell: Arc<RecordingShell>, store: Box<dyn ConfigStore>) -> Launcher {
    Launcher::new(paths, shell)
        .with_config_store(store)
        .with_gate(passing_gate(paths))
        .with_system_locale(Some("en-US".into()))
        .with_update_url(None)
        .with_reporter(None)
        .with_settle_delay(Duration::ZERO)
}
