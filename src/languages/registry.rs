//! Language registry: the provider's supported languages, loaded once.
//!
//! The registry maps canonical codes to display names and keeps a derived
//! alias table (normalized code -> canonical code). It is immutable after
//! construction and shared behind an `Arc` for the lifetime of the process.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::code::{normalize, LanguageCode, AUTO};

/// One supported language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageEntry {
    /// Canonical provider code (e.g. "en", "zh-TW")
    pub code: String,

    /// Display name as reported by the provider (e.g. "chinese (traditional)")
    pub name: String,
}

/// Registry of supported languages.
#[derive(Debug, Clone)]
pub struct CodeRegistry {
    /// Sorted by code for stable listing output
    entries: Vec<LanguageEntry>,

    /// normalized alias -> canonical code
    aliases: HashMap<String, String>,
}

impl CodeRegistry {
    /// Build the registry from a provider capability list.
    ///
    /// # Arguments
    /// * `supported` - Display name -> canonical code, as returned by the
    ///   provider's `supported_languages` query.
    ///
    /// Codes are deduplicated case-insensitively; if the provider lists the
    /// same code under two names, the first name in iteration order wins.
    pub fn from_supported(supported: &BTreeMap<String, String>) -> Self {
        let mut entries: Vec<LanguageEntry> = Vec::with_capacity(supported.len());
        let mut aliases = HashMap::with_capacity(supported.len() + 1);

        for (name, code) in supported {
            let key = normalize(code);
            if key.is_empty() || key == AUTO || aliases.contains_key(&key) {
                debug!("Skipping duplicate or reserved language code '{}'", code);
                continue;
            }
            aliases.insert(key, code.clone());
            entries.push(LanguageEntry {
                code: code.clone(),
                name: name.clone(),
            });
        }

        aliases.insert(AUTO.to_string(), AUTO.to_string());
        entries.sort_by(|a, b| a.code.cmp(&b.code));

        Self { entries, aliases }
    }

    /// Resolve a user alias to a canonical code.
    ///
    /// # Returns
    /// * `Some(LanguageCode)` if `normalize(alias)` is a known code or `auto`
    /// * `None` otherwise
    pub fn resolve(&self, alias: &str) -> Option<LanguageCode> {
        let key = normalize(alias);
        match self.aliases.get(&key) {
            Some(code) if code == AUTO => Some(LanguageCode::auto()),
            Some(code) => Some(LanguageCode::new(code.clone())),
            None => None,
        }
    }

    /// Whether an alias resolves to a code (including `auto`).
    pub fn is_supported(&self, alias: &str) -> bool {
        self.aliases.contains_key(&normalize(alias))
    }

    /// Display name for a canonical code or alias.
    pub fn name_of(&self, alias: &str) -> Option<&str> {
        let code = self.aliases.get(&normalize(alias))?;
        self.entries
            .iter()
            .find(|entry| &entry.code == code)
            .map(|entry| entry.name.as_str())
    }

    /// All supported languages, sorted by code. Does not include `auto`.
    pub fn entries(&self) -> &[LanguageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
