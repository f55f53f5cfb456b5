use crate::config::global::GlobalConfig;
use crate::models::error::SError;
use crate::models::paths::SlotTable;
use crate::models::session::{CommandLineOverrides, SessionCredential, SessionDecision};
use crate::models::slot::AccountSlot;
use crate::utils::toml::Toml;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Read side of the per-slot credential store. The login flow owns writes.
pub trait SessionStore {
    fn load(&self, slot: AccountSlot) -> Result<SessionCredential, SError>;
}

/// On-disk layout of an account file: a `[Cookie]` table.
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct AccountFile {
    #[serde(rename = "Cookie", default)]
    pub cookie: SessionCredential,
}

/// One TOML account file per slot, located through the slot table.
pub struct TomlSessionStore {
    slots: SlotTable,
}

impl TomlSessionStore {
    pub fn new(slots: SlotTable) -> Self {
        Self { slots }
    }
}

impl SessionStore for TomlSessionStore {
    fn load(&self, slot: AccountSlot) -> Result<SessionCredential, SError> {
        let path = self.slots.account_file(slot);
        if !path.exists() {
            return Ok(SessionCredential::default());
        }
        Toml::read::<AccountFile>(path).map(|file| file.cookie)
    }
}

/// Picks between silently resuming a slot and showing the account picker.
///
/// An explicit slot override always attempts a resume, whatever the auto-login
/// preference says. Store errors count as missing credentials.
#[instrument(skip(config, store))]
pub fn decide(
    overrides: &CommandLineOverrides,
    config: &GlobalConfig,
    store: &dyn SessionStore,
) -> SessionDecision {
    let slot = match overrides.account_slot {
        Some(slot) => {
            info!("Using command line account slot {slot}");
            slot
        }
        None if !config.auto_login_enabled => {
            info!("Auto login disabled");
            return SessionDecision::ShowPicker;
        }
        None => {
            info!("Auto login enabled for {}", config.account_slot);
            config.account_slot
        }
    };

    match store.load(slot) {
        Ok(credential) if credential.is_valid() => {
            info!("Stored session for {slot} is valid, resuming");
            SessionDecision::Resume(slot)
        }
        Ok(_) => {
            warn!("No valid stored session for {slot}");
            SessionDecision::ShowPicker
        }
        Err(e) => {
            warn!("Reading stored session for {slot} failed: {e}");
            SessionDecision::ShowPicker
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct MapStore(BTreeMap<AccountSlot, SessionCredential>);

    impl MapStore {
        fn with(slot: AccountSlot, sid: &str, token: &str) -> Self {
            let mut map = BTreeMap::new();
            map.insert(
                slot,
                SessionCredential {
                    session_id: sid.into(),
                    secondary_token: token.into(),
                },
            );
            Self(map)
        }
    }

    impl SessionStore for MapStore {
        fn load(&self, slot: AccountSlot) -> Result<SessionCredential, SError> {
            Ok(self.0.get(&slot).cloned().unwrap_or_default())
        }
    }

    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn load(&self, _: AccountSlot) -> Result<SessionCredential, SError> {
            Err(SError::IOError("disk on fire".into()))
        }
    }

    fn config(auto_login: bool, slot: AccountSlot) -> GlobalConfig {
        GlobalConfig {
            account_slot: slot,
            auto_login_enabled: auto_login,
            ..GlobalConfig::default()
        }
    }

    fn override_slot(slot: AccountSlot) -> CommandLineOverrides {
        CommandLineOverrides {
            account_slot: Some(slot),
            game: None,
        }
    }

    #[test]
    fn override_without_credential_shows_picker_regardless_of_auto_login() {
        let store = MapStore::with(AccountSlot::S0, "remid", "sid");
        for auto_login in [true, false] {
            let decision = decide(&override_slot(AccountSlot::S2), &config(auto_login, AccountSlot::S0), &store);
            assert_eq!(decision, SessionDecision::ShowPicker);
        }
    }

    #[test]
    fn override_bypasses_disabled_auto_login() {
        let store = MapStore::with(AccountSlot::S2, "remid", "sid");
        let decision = decide(&override_slot(AccountSlot::S2), &config(false, AccountSlot::S0), &store);
        assert_eq!(decision, SessionDecision::Resume(AccountSlot::S2));
    }

    #[test]
    fn auto_login_with_complete_credential_resumes() {
        let store = MapStore::with(AccountSlot::S0, "remid", "sid");
        let decision = decide(&CommandLineOverrides::default(), &config(true, AccountSlot::S0), &store);
        assert_eq!(decision, SessionDecision::Resume(AccountSlot::S0));
    }

    #[test]
    fn disabled_auto_login_shows_picker_even_with_credential() {
        let store = MapStore::with(AccountSlot::S0, "remid", "sid");
        let decision = decide(&CommandLineOverrides::default(), &config(false, AccountSlot::S0), &store);
        assert_eq!(decision, SessionDecision::ShowPicker);
    }

    #[test]
    fn half_a_credential_is_not_enough() {
        let store = MapStore::with(AccountSlot::S1, "remid", "  ");
        let decision = decide(&CommandLineOverrides::default(), &config(true, AccountSlot::S1), &store);
        assert_eq!(decision, SessionDecision::ShowPicker);
    }

    #[test]
    fn store_failure_falls_back_to_picker() {
        let decision = decide(&override_slot(AccountSlot::S4), &config(true, AccountSlot::S0), &BrokenStore);
        assert_eq!(decision, SessionDecision::ShowPicker);
    }
}
