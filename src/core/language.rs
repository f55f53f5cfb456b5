use crate::models::locale::LocaleEntry;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Used when neither the configured nor the system language is supported.
pub const FALLBACK_LANGUAGE: &str = "zh-CN";

const CATALOG_JSON: &str = include_str!("../../assets/languages.json");

fn builtin_bundle_json(code: &str) -> Option<&'static str> {
    match code {
        "en-US" => Some(include_str!("../../assets/lang/en-US.json")),
        "zh-CN" => Some(include_str!("../../assets/lang/zh-CN.json")),
        "zh-TW" => Some(include_str!("../../assets/lang/zh-TW.json")),
        "ru-RU" => Some(include_str!("../../assets/lang/ru-RU.json")),
        _ => None,
    }
}

/// Supported UI locales. Immutable for the process lifetime.
#[derive(Clone, Debug)]
pub struct LocaleCatalog {
    entries: Vec<LocaleEntry>,
}

impl LocaleCatalog {
    pub fn new(entries: Vec<LocaleEntry>) -> Self {
        Self { entries }
    }

    /// The catalog shipped with the binary.
    pub fn builtin() -> Self {
        match serde_json::from_str::<Vec<LocaleEntry>>(CATALOG_JSON) {
            Ok(entries) => Self::new(entries),
            Err(e) => {
                warn!("Embedded language catalog is invalid: {e}");
                Self::new(vec![LocaleEntry {
                    code: FALLBACK_LANGUAGE.into(),
                    display_name: FALLBACK_LANGUAGE.into(),
                }])
            }
        }
    }

    /// Case-insensitive exact lookup.
    pub fn find(&self, code: &str) -> Option<&LocaleEntry> {
        self.entries
            .iter()
            .find(|e| e.code.eq_ignore_ascii_case(code))
    }

    fn find_by_language(&self, language: &str) -> Option<&LocaleEntry> {
        self.entries
            .iter()
            .find(|e| language_part(&e.code).eq_ignore_ascii_case(language))
    }
}

/// `en-US` / `en_US` -> `en`
fn language_part(code: &str) -> &str {
    code.split(['-', '_']).next().unwrap_or(code)
}

/// Picks the UI locale. First match wins: configured code, exact system
/// locale, system language prefix, then [`FALLBACK_LANGUAGE`].
pub fn resolve(configured: Option<&str>, system: Option<&str>, catalog: &LocaleCatalog) -> String {
    let configured = configured.map(str::trim).filter(|c| !c.is_empty());
    if let Some(entry) = configured.and_then(|c| catalog.find(c)) {
        return entry.code.clone();
    }

    let system = system.map(str::trim).filter(|s| !s.is_empty());
    if let Some(system) = system {
        if let Some(entry) = catalog.find(system) {
            return entry.code.clone();
        }
        let language = language_part(system);
        if !language.is_empty() {
            if let Some(entry) = catalog.find_by_language(language) {
                return entry.code.clone();
            }
        }
    }

    FALLBACK_LANGUAGE.to_owned()
}

pub fn system_locale() -> Option<String> {
    sys_locale::get_locale()
}

/// Key -> text table for one locale.
#[derive(Clone, Debug, Default)]
pub struct LocaleBundle {
    pub code: String,
    strings: BTreeMap<String, String>,
}

impl LocaleBundle {
    pub fn new(code: impl Into<String>, strings: BTreeMap<String, String>) -> Self {
        Self {
            code: code.into(),
            strings,
        }
    }

    /// Loads the embedded bundle for `code`. Unknown codes give an empty bundle.
    pub fn load(code: &str) -> Self {
        let strings = builtin_bundle_json(code)
            .map(serde_json::from_str::<BTreeMap<String, String>>)
            .transpose()
            .unwrap_or_else(|e| {
                warn!("Language bundle {code} is invalid: {e}");
                None
            })
            .unwrap_or_else(|| {
                warn!("No language bundle for {code}");
                BTreeMap::new()
            });
        Self::new(code, strings)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }
}

/// The single active locale bundle.
pub struct ActiveLocale {
    current: RwLock<Arc<LocaleBundle>>,
}

impl ActiveLocale {
    pub fn new(bundle: LocaleBundle) -> Self {
        Self {
            current: RwLock::new(Arc::new(bundle)),
        }
    }

    /// Replaces the active bundle in one step and hands back the one it displaced.
    pub fn apply(&self, bundle: LocaleBundle) -> Arc<LocaleBundle> {
        let next = Arc::new(bundle);
        let previous = std::mem::replace(&mut *self.current.write(), next);
        info!("Language switched from {} to {}", previous.code, self.code());
        previous
    }

    pub fn code(&self) -> String {
        self.current.read().code.clone()
    }

    /// Localized text for `key`; the key itself when the bundle lacks it.
    pub fn text(&self, key: &str) -> String {
        let bundle = self.current.read();
        match bundle.get(key) {
            Some(text) => text.to_owned(),
            None => {
                debug!("Missing translation {key} in {}", bundle.code);
                key.to_owned()
            }
        }
    }

    /// Like [`text`](Self::text) with `{0}`, `{1}`... substituted in order.
    pub fn format(&self, key: &str, args: &[&dyn std::fmt::Display]) -> String {
        args.iter()
            .enumerate()
            .fold(self.text(key), |acc, (i, arg)| {
                acc.replace(&format!("{{{i}}}"), &arg.to_string())
            })
    }
}

impl Default for ActiveLocale {
    fn default() -> Self {
        Self::new(LocaleBundle::new(FALLBACK_LANGUAGE, BTreeMap::new()))
    }
}
