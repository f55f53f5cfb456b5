use crate::config::ConfigStore;
use crate::core::language::ActiveLocale;
use crate::core::shell::{Notice, Shell};
use crate::models::error::SError;
use crate::models::game::GameType;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;
use strum::IntoEnumIterator;
use tracing::{info, instrument, warn};

/// Pause before each launch step so the local services have come up.
pub const SETTLE_DELAY: Duration = Duration::from_secs(3);

const GAMES_SECTION: &str = "Games";

/// Game-launch executor.
pub trait GameLauncher: Send + Sync {
    fn is_installed(&self, game: GameType) -> bool;
    fn launch(&self, game: GameType) -> Result<(), SError>;
}

/// Starts games from executable paths kept in the `Games` config section.
pub struct ExecutableLauncher {
    executables: BTreeMap<GameType, PathBuf>,
}

impl ExecutableLauncher {
    pub fn new(executables: BTreeMap<GameType, PathBuf>) -> Self {
        Self { executables }
    }

    pub fn from_store(store: &dyn ConfigStore) -> Self {
        let executables = GameType::iter()
            .filter_map(|game| {
                store
                    .get(GAMES_SECTION, &game.to_string())
                    .filter(|p| !p.trim().is_empty())
                    .map(|p| (game, PathBuf::from(p.trim())))
            })
            .collect();
        Self::new(executables)
    }
}

impl GameLauncher for ExecutableLauncher {
    fn is_installed(&self, game: GameType) -> bool {
        self.executables.get(&game).is_some_and(|p| p.is_file())
    }

    fn launch(&self, game: GameType) -> Result<(), SError> {
        let exe = self
            .executables
            .get(&game)
            .ok_or_else(|| SError::LaunchError(game.display_name().to_string()))?;
        let mut cmd = Command::new(exe);
        if let Some(dir) = exe.parent() {
            cmd.current_dir(dir);
        }
        let child = cmd
            .spawn()
            .map_err(|e| SError::LaunchError(format!("{}: {e}", game.display_name())))?;
        info!("Started {} (pid {})", game.display_name(), child.id());
        Ok(())
    }
}

/// Launches the game requested on the command line once the main window is up.
#[instrument(skip(launcher, shell, locale))]
pub async fn auto_launch(
    game: GameType,
    launcher: Arc<dyn GameLauncher>,
    shell: Arc<dyn Shell>,
    locale: Arc<ActiveLocale>,
    settle: Duration,
) -> Result<(), SError> {
    tokio::time::sleep(settle).await;
    info!("Auto-launching {} requested on the command line", game.display_name());

    if !launcher.is_installed(game) {
        warn!("{} is not installed, skipping auto-launch", game.display_name());
        shell.notify(Notice::Warning(
            locale.format("Game.NotInstalled", &[&game.display_name()]),
        ));
        return Ok(());
    }

    tokio::time::sleep(settle).await;
    tokio::task::spawn_blocking(move || launcher.launch(game)).await?
}
