use crate::config::{ConfigStore, ConfyStore, APP_NAME};
use crate::core::cmdline;
use crate::core::crash::{spawn_supervised, CrashReporter};
use crate::core::game::{auto_launch, ExecutableLauncher, GameLauncher, SETTLE_DELAY};
use crate::core::gate::EnvironmentGate;
use crate::core::language::{self, LocaleBundle, LocaleCatalog};
use crate::core::registry::AppRegistry;
use crate::core::session::{self, SessionStore, TomlSessionStore};
use crate::core::shell::{Notice, Shell, WindowKind};
use crate::core::update;
use crate::models::error::SError;
use crate::models::paths::{AppPaths, SlotTable};
use crate::models::session::{CommandLineOverrides, SessionDecision};
use crate::utils::lock::InstanceLock;
use semver::Version;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

const UPDATE_SECTION: &str = "Update";
const UPDATE_URL_KEY: &str = "Url";

/// Result of a successful boot. Holds the single-instance lock; keep it alive
/// until the process exits.
#[derive(Debug)]
pub struct BootOutcome {
    pub decision: SessionDecision,
    pub overrides: CommandLineOverrides,
    lock: InstanceLock,
}

impl BootOutcome {
    pub fn lock(&self) -> &InstanceLock {
        &self.lock
    }
}

/// Drives startup: config, language, environment gate, overrides, session decision.
pub struct Launcher {
    registry: Arc<AppRegistry>,
    slots: SlotTable,
    shell: Arc<dyn Shell>,
    gate: EnvironmentGate,
    sessions: Box<dyn SessionStore + Send + Sync>,
    games: Arc<dyn GameLauncher>,
    reporter: Option<Arc<CrashReporter>>,
    system_locale: Option<String>,
    version: Version,
    update_url: Option<String>,
    settle_delay: Duration,
}

impl Launcher {
    /// Wires the default collaborators for the data root described by `paths`.
    pub fn new(paths: &AppPaths, shell: Arc<dyn Shell>) -> Self {
        let store = ConfyStore::open(&paths.config_file);
        let slots = SlotTable::build(paths);
        let games = ExecutableLauncher::from_store(&store);
        let update_url = store
            .get(UPDATE_SECTION, UPDATE_URL_KEY)
            .filter(|u| !u.trim().is_empty());
        let version = Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| Version::new(0, 0, 0));

        Self {
            registry: Arc::new(AppRegistry::new(Box::new(store), LocaleCatalog::builtin())),
            sessions: Box::new(TomlSessionStore::new(slots.clone())),
            slots,
            shell,
            gate: EnvironmentGate::new(&paths.lock_file),
            games: Arc::new(games),
            reporter: CrashReporter::installed(),
            system_locale: language::system_locale(),
            version,
            update_url,
            settle_delay: SETTLE_DELAY,
        }
    }

    pub fn with_config_store(mut self, store: Box<dyn ConfigStore>) -> Self {
        self.registry = Arc::new(AppRegistry::new(store, self.registry.catalog.clone()));
        self
    }

    pub fn with_gate(mut self, gate: EnvironmentGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_session_store(mut self, store: impl SessionStore + Send + Sync + 'static) -> Self {
        self.sessions = Box::new(store);
        self
    }

    pub fn with_game_launcher(mut self, games: Arc<dyn GameLauncher>) -> Self {
        self.games = games;
        self
    }

    pub fn with_system_locale(mut self, locale: Option<String>) -> Self {
        self.system_locale = locale;
        self
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn with_update_url(mut self, url: Option<String>) -> Self {
        self.update_url = url;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_reporter(mut self, reporter: Option<Arc<CrashReporter>>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn registry(&self) -> &Arc<AppRegistry> {
        &self.registry
    }

    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    /// Runs the blocking part of startup. Any gate failure has already been shown
    /// to the user and the shell asked to shut down when this returns `Err`.
    #[instrument(skip_all)]
    pub fn boot<S: AsRef<str>>(&self, args: &[S]) -> Result<BootOutcome, SError> {
        let config = self.registry.load_config();

        let code = language::resolve(
            config.default_language.as_deref(),
            self.system_locale.as_deref(),
            &self.registry.catalog,
        );
        self.registry.locale.apply(LocaleBundle::load(&code));
        info!("Welcome to {APP_NAME} {}", self.version);

        let lock = match self.gate.run(self.shell.as_ref(), &self.registry.locale) {
            Ok(lock) => lock,
            Err(e) => {
                warn!("Startup aborted: {e}");
                self.shell.shutdown();
                return Err(e);
            }
        };

        let overrides = cmdline::parse(args);
        *self.registry.overrides.lock() = overrides;

        let decision = session::decide(&overrides, &config, self.sessions.as_ref());
        let window = match decision {
            SessionDecision::Resume(slot) => {
                *self.registry.active_slot.lock() = slot;
                WindowKind::Loading
            }
            SessionDecision::ShowPicker => {
                *self.registry.active_slot.lock() = overrides.account_slot.unwrap_or(config.account_slot);
                WindowKind::AccountPicker
            }
        };
        info!(
            "Active slot {}, cache dir {}",
            self.registry.active_slot(),
            self.slots.cache_dir(self.registry.active_slot())
        );
        self.shell.show_window(window);

        Ok(BootOutcome {
            decision,
            overrides,
            lock,
        })
    }

    /// Starts the post-window background work: the requested game launch and the
    /// update check. Neither blocks the other. Must run inside a tokio runtime.
    pub fn on_main_window_ready(&self) -> Vec<JoinHandle<()>> {
        let mut tasks = Vec::new();

        if let Some(game) = self.registry.overrides().game {
            let games = self.games.clone();
            let shell = self.shell.clone();
            let locale = self.registry.locale.clone();
            let settle = self.settle_delay;
            tasks.push(spawn_supervised(
                self.reporter.clone(),
                "auto-launch",
                async move { auto_launch(game, games, shell, locale, settle).await },
            ));
        }

        match self.update_url.clone() {
            Some(url) => {
                let shell = self.shell.clone();
                let locale = self.registry.locale.clone();
                let current = self.version.clone();
                shell.notify(Notice::Info(locale.text("Update.Checking")));
                tasks.push(spawn_supervised(self.reporter.clone(), "update-check", async move {
                    let result = update::run_check(url, &current).await;
                    update::surface(&result, &current, shell.as_ref(), &locale);
                    Ok(())
                }));
            }
            None => info!("No update endpoint configured, skipping update check"),
        }

        tasks
    }
}
