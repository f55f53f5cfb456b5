use crate::config::global::GlobalConfig;
use crate::core::language::LocaleBundle;
use crate::core::registry::AppRegistry;
use crate::models::slot::AccountSlot;
use tracing::{error, info, warn};

/// What closing the main window should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    /// Keep running in the tray. `notify` is set the first time only.
    HideToTray { notify: bool },
    Exit,
}

/// A code-initiated close (account switch, exit menu) always exits.
pub fn close_action(close_to_tray: bool, user_initiated: bool, already_notified: bool) -> CloseAction {
    if user_initiated && close_to_tray {
        CloseAction::HideToTray {
            notify: !already_notified,
        }
    } else {
        CloseAction::Exit
    }
}

impl AppRegistry {
    fn mutate_config(&self, f: impl FnOnce(&mut GlobalConfig)) {
        let snapshot = {
            let mut config = self.global_config.lock();
            f(&mut config);
            config.clone()
        };
        let mut store = self.config_store.lock();
        match snapshot.save(&mut **store) {
            Ok(()) => info!("Global config saved"),
            Err(e) => error!("Saving global config failed: {e}"),
        }
    }

    pub fn set_close_to_tray(&self, enabled: bool) {
        self.mutate_config(|c| c.close_to_tray = enabled);
    }

    pub fn set_auto_login(&self, enabled: bool) {
        self.mutate_config(|c| c.auto_login_enabled = enabled);
    }

    /// Account picked interactively: becomes both the active and the saved slot.
    pub fn select_slot(&self, slot: AccountSlot) {
        *self.active_slot.lock() = slot;
        self.mutate_config(|c| c.account_slot = slot);
    }

    /// Applies a supported language right away and remembers it.
    /// Returns `false` when the code is not in the catalog.
    pub fn change_language(&self, code: &str) -> bool {
        let Some(entry) = self.catalog.find(code) else {
            warn!("Refusing unsupported language {code:?}");
            return false;
        };
        let code = entry.code.clone();
        self.locale.apply(LocaleBundle::load(&code));
        self.mutate_config(|c| c.default_language = Some(code));
        true
    }

    pub fn close_action(&self, user_initiated: bool, already_notified: bool) -> CloseAction {
        close_action(self.config().close_to_tray, user_initiated, already_notified)
    }
}
