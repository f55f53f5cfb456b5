pub mod global;

use crate::models::error::SError;
use camino::{Utf8Path, Utf8PathBuf};
use directories::ProjectDirs;
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const APP_NAME: &str = "EADesktop";

/// Section -> key -> value, as persisted on disk.
pub type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// The on-disk document before values are normalised to strings.
type RawDocument = BTreeMap<String, toml::Value>;

fn scalar_text(value: toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

fn flatten(raw: RawDocument) -> Sections {
    let mut sections = Sections::new();
    for (name, value) in raw {
        let toml::Value::Table(table) = value else {
            warn!("Ignoring top-level config entry {name:?}, expected a section");
            continue;
        };
        let section: &mut BTreeMap<String, String> = sections.entry(name.clone()).or_default();
        for (key, value) in table {
            match scalar_text(value) {
                Some(text) => {
                    section.insert(key, text);
                }
                None => warn!("Ignoring config entry {name}.{key}, expected a plain value"),
            }
        }
    }
    sections
}

/// Resolves the data root: the per-user config dir, else the executable's dir, else `.`.
pub fn default_base_dir() -> Utf8PathBuf {
    ProjectDirs::from("com", "ea-emu", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|exe_path| exe_path.parent().map(|p| p.to_path_buf()))
        })
        .and_then(|p| Utf8PathBuf::from_path_buf(p).ok())
        .unwrap_or_else(|| Utf8PathBuf::from("."))
}

/// Opaque section/key/value string store.
pub trait ConfigStore: Send {
    fn get(&self, section: &str, key: &str) -> Option<String>;
    fn set(&mut self, section: &str, key: &str, value: &str);
    fn flush(&self) -> Result<(), SError>;
}

/// TOML document persisted through confy.
pub struct ConfyStore {
    path: Utf8PathBuf,
    sections: Sections,
}

impl ConfyStore {
    /// Never fails: a corrupt or unreadable file is logged and treated as empty.
    /// Entries are read one by one; a value that is not a scalar is dropped alone.
    pub fn open(path: &Utf8Path) -> Self {
        let sections = match confy::load_path::<RawDocument>(path) {
            Ok(raw) => flatten(raw),
            Err(e) => {
                warn!("Config store {path} unreadable, starting empty: {e}");
                Sections::default()
            }
        };
        debug!("Config store opened at {path}");
        Self {
            path: path.to_owned(),
            sections,
        }
    }

}

impl ConfigStore for ConfyStore {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.sections.get(section)?.get(key).cloned()
    }

    fn set(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_owned())
            .or_default()
            .insert(key.to_owned(), value.to_owned());
    }

    fn flush(&self) -> Result<(), SError> {
        confy::store_path(&self.path, &self.sections).map_err(SError::from)
    }
}

/// In-memory store, nothing is written anywhere.
#[derive(Default, Clone, Debug)]
pub struct MemoryStore {
    pub sections: Sections,
}

impl ConfigStore for MemoryStore {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.sections.get(section)?.get(key).cloned()
    }

    fn set(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_owned())
            .or_default()
            .insert(key.to_owned(), value.to_owned());
    }

    fn flush(&self) -> Result<(), SError> {
        Ok(())
    }
}
