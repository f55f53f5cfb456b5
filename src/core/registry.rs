// src/core/registry.rs
use crate::config::global::GlobalConfig;
use crate::config::ConfigStore;
use crate::core::language::{ActiveLocale, LocaleCatalog};
use crate::models::session::CommandLineOverrides;
use crate::models::slot::AccountSlot;
use parking_lot::Mutex;
use std::sync::Arc;

/// Process-wide state shared by the startup path, settings and background tasks.
pub struct AppRegistry {
    pub global_config: Arc<Mutex<GlobalConfig>>,
    pub config_store: Arc<Mutex<Box<dyn ConfigStore>>>,
    pub catalog: LocaleCatalog,
    pub locale: Arc<ActiveLocale>,
    /// Slot this run operates under. Differs from the configured slot when
    /// a command line override is in effect.
    pub active_slot: Arc<Mutex<AccountSlot>>,
    pub overrides: Arc<Mutex<CommandLineOverrides>>,
}

impl AppRegistry {
    pub fn new(store: Box<dyn ConfigStore>, catalog: LocaleCatalog) -> Self {
        Self {
            global_config: Arc::new(Mutex::new(GlobalConfig::default())),
            config_store: Arc::new(Mutex::new(store)),
            catalog,
            locale: Arc::new(ActiveLocale::default()),
            active_slot: Arc::new(Mutex::new(AccountSlot::default())),
            overrides: Arc::new(Mutex::new(CommandLineOverrides::default())),
        }
    }

    /// Replaces the in-memory config with what the store holds.
    pub fn load_config(&self) -> GlobalConfig {
        let config = {
            let store = self.config_store.lock();
            GlobalConfig::load(&**store, &self.catalog)
        };
        *self.global_config.lock() = config.clone();
        *self.active_slot.lock() = config.account_slot;
        config
    }

    pub fn config(&self) -> GlobalConfig {
        self.global_config.lock().clone()
    }

    pub fn active_slot(&self) -> AccountSlot {
        *self.active_slot.lock()
    }

    pub fn overrides(&self) -> CommandLineOverrides {
        *self.overrides.lock()
    }
}
