// src/config/global.rs
use crate::config::ConfigStore;
use crate::core::language::LocaleCatalog;
use crate::models::error::SError;
use crate::models::slot::AccountSlot;
use tracing::{info, warn};

const SECTION: &str = "Globals";
const KEY_SLOT: &str = "AccountSlot";
const KEY_LANG: &str = "lang";
const KEY_AUTO_LOGIN: &str = "AutoLoginEnabled";
const KEY_CLOSE_TO_TRAY: &str = "CloseToTray";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalConfig {
    pub account_slot: AccountSlot,
    /// Language the user picked explicitly. `None` follows the system.
    pub default_language: Option<String>,
    pub auto_login_enabled: bool,
    pub close_to_tray: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            account_slot: AccountSlot::S0,
            default_language: None,
            auto_login_enabled: false,
            close_to_tray: true,
        }
    }
}

impl GlobalConfig {
    /// Reads every field independently; absent or malformed values keep their default.
    pub fn load(store: &dyn ConfigStore, catalog: &LocaleCatalog) -> Self {
        let mut config = Self::default();
        let read = |key: &str| {
            store
                .get(SECTION, key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        match read(KEY_SLOT) {
            Some(raw) => match AccountSlot::from_name(&raw) {
                Some(slot) => config.account_slot = slot,
                None => warn!("Ignoring malformed {KEY_SLOT} value {raw:?}"),
            },
            None => info!("{KEY_SLOT} not configured, using {}", config.account_slot),
        }

        if let Some(raw) = read(KEY_LANG) {
            match catalog.find(&raw) {
                Some(entry) => config.default_language = Some(entry.code.clone()),
                None => warn!("Configured language {raw:?} is not supported, ignoring"),
            }
        }

        match read(KEY_AUTO_LOGIN).map(|raw| (parse_bool(&raw), raw)) {
            Some((Some(v), _)) => config.auto_login_enabled = v,
            Some((None, raw)) => warn!("Ignoring malformed {KEY_AUTO_LOGIN} value {raw:?}"),
            None => info!("Auto login not configured"),
        }

        if let Some(raw) = read(KEY_CLOSE_TO_TRAY) {
            match parse_bool(&raw) {
                Some(v) => config.close_to_tray = v,
                None => warn!("Ignoring malformed {KEY_CLOSE_TO_TRAY} value {raw:?}"),
            }
        }

        info!(
            slot = %config.account_slot,
            lang = config.default_language.as_deref().unwrap_or(""),
            auto_login = config.auto_login_enabled,
            close_to_tray = config.close_to_tray,
            "Global config loaded"
        );
        config
    }

    pub fn save(&self, store: &mut dyn ConfigStore) -> Result<(), SError> {
        store.set(SECTION, KEY_SLOT, &self.account_slot.to_string());
        store.set(SECTION, KEY_LANG, self.default_language.as_deref().unwrap_or(""));
        store.set(SECTION, KEY_AUTO_LOGIN, &self.auto_login_enabled.to_string());
        store.set(SECTION, KEY_CLOSE_TO_TRAY, &self.close_to_tray.to_string());
        store.flush()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfyStore, MemoryStore};

    fn store_with(pairs: &[(&str, &str)]) -> MemoryStore {
        let mut store = MemoryStore::default();
        for (k, v) in pairs {
            store.set(SECTION, k, v);
        }
        store
    }

    #[test]
    fn empty_store_yields_safe_defaults() {
        let config = GlobalConfig::load(&MemoryStore::default(), &LocaleCatalog::builtin());
        assert_eq!(config, GlobalConfig::default());
        assert_eq!(config.account_slot, AccountSlot::S0);
        assert!(!config.auto_login_enabled);
        assert!(config.close_to_tray);
    }

    #[test]
    fn malformed_fields_fall_back_individually() {
        let store = store_with(&[
            (KEY_SLOT, "S77"),
            (KEY_LANG, "xx-YY"),
            (KEY_AUTO_LOGIN, "yes"),
            (KEY_CLOSE_TO_TRAY, "False"),
        ]);
        let config = GlobalConfig::load(&store, &LocaleCatalog::builtin());

        assert_eq!(config.account_slot, AccountSlot::S0);
        assert_eq!(config.default_language, None);
        assert!(!config.auto_login_enabled);
        assert!(!config.close_to_tray);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let mut store = MemoryStore::default();
        let config = GlobalConfig {
            account_slot: AccountSlot::S5,
            default_language: Some("en-US".into()),
            auto_login_enabled: true,
            close_to_tray: false,
        };
        config.save(&mut store).unwrap();

        assert_eq!(store.get(SECTION, KEY_AUTO_LOGIN).as_deref(), Some("true"));
        assert_eq!(GlobalConfig::load(&store, &LocaleCatalog::builtin()), config);
    }

    #[test]
    fn configured_language_is_canonicalised() {
        let store = store_with(&[(KEY_LANG, "EN-us")]);
        let config = GlobalConfig::load(&store, &LocaleCatalog::builtin());
        assert_eq!(config.default_language.as_deref(), Some("en-US"));
    }

    #[test]
    fn hand_written_booleans_load_from_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = camino::Utf8PathBuf::from_path_buf(tmp.path().join("Config.toml")).unwrap();
        std::fs::write(
            &path,
            "[Globals]\nAccountSlot = \"S3\"\nAutoLoginEnabled = true\nCloseToTray = 0\n",
        )
        .unwrap();

        let store = ConfyStore::open(&path);
        let config = GlobalConfig::load(&store, &LocaleCatalog::builtin());

        assert_eq!(config.account_slot, AccountSlot::S3);
        assert!(config.auto_login_enabled);
        // "0" is not a boolean, only this field keeps its default
        assert!(config.close_to_tray);
    }
}
