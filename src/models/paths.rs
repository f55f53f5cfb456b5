use crate::models::slot::AccountSlot;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;

macro_rules! define_paths {
    ($name:ident { $($field:ident : $default:expr),* $(,)? }) => {
        #[derive(Clone, Debug)]
        pub struct $name {
            $(pub $field: Utf8PathBuf,)*
        }

        impl $name {
            pub fn to_absolute(mut self, base: &Utf8Path) -> Self {
                $(self.$field = base.join(self.$field);)*
                self
            }

            pub fn new(base: &Utf8Path) -> Self {
                Self::default().to_absolute(base)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $($field: $default.into(),)*
                }
            }
        }
    };
}

define_paths!(AppPaths {
    config_file: "Config/Config.toml",
    accounts_dir: "Config/Account",
    cache_dir: "Cache",
    log_dir: "Log",
    crash_dir: "Log/Crash",
    lock_file: "EADesktop.lock",
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotPaths {
    /// Session credential store for the slot.
    pub account_file: Utf8PathBuf,
    /// Isolated web-cache directory for the slot.
    pub cache_dir: Utf8PathBuf,
}

/// Slot -> storage locations. Built once at startup, never mutated.
#[derive(Clone, Debug)]
pub struct SlotTable {
    entries: BTreeMap<AccountSlot, SlotPaths>,
}

impl SlotTable {
    pub fn build(paths: &AppPaths) -> Self {
        let entries = AccountSlot::all()
            .map(|slot| {
                let n = slot.index();
                let entry = SlotPaths {
                    account_file: paths.accounts_dir.join(format!("Account{n}.toml")),
                    cache_dir: paths.cache_dir.join(format!("Account{n}")),
                };
                (slot, entry)
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, slot: AccountSlot) -> &SlotPaths {
        // every slot is inserted by `build`
        &self.entries[&slot]
    }

    pub fn account_file(&self, slot: AccountSlot) -> &Utf8Path {
        &self.get(slot).account_file
    }

    pub fn cache_dir(&self, slot: AccountSlot) -> &Utf8Path {
        &self.get(slot).cache_dir
    }
}
