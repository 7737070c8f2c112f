//! Per-guild target language settings, held in memory.
//!
//! Aliases are stored exactly as the user typed them, in insertion order.
//! Presence checks (duplicate detection on add, matching on remove) compare
//! normalized keys, so `zh_tw` and `zh-TW` count as the same entry.

use std::collections::HashMap;

use crate::languages::{normalize, CodeRegistry};

/// Targets used by guilds that never configured any.
pub const DEFAULT_TARGETS: &[&str] = &["zh-TW", "en"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("language not configured: {0}")]
    AliasNotPresent(String),

    #[error("no languages given")]
    Empty,
}

/// Guild id -> ordered target aliases.
#[derive(Debug, Clone)]
pub struct GuildSettings {
    targets: HashMap<u64, Vec<String>>,
    default_targets: Vec<String>,
}

impl Default for GuildSettings {
    fn default() -> Self {
        Self::new(DEFAULT_TARGETS.iter().map(|s| s.to_string()).collect())
    }
}

impl GuildSettings {
    /// Create an empty store whose unconfigured guilds read as `default_targets`.
    pub fn new(default_targets: Vec<String>) -> Self {
        Self {
            targets: HashMap::new(),
            default_targets,
        }
    }

    /// Targets for a guild, or the defaults if it has none stored.
    ///
    /// Reading never writes the defaults back.
    pub fn get_targets(&self, guild_id: u64) -> Vec<String> {
        self.targets
            .get(&guild_id)
            .cloned()
            .unwrap_or_else(|| self.default_targets.clone())
    }

    /// Whether the guild has an explicit entry.
    pub fn is_configured(&self, guild_id: u64) -> bool {
        self.targets.contains_key(&guild_id)
    }

    /// Replace a guild's targets. All-or-nothing: one unsupported alias rejects
    /// the whole call.
    pub fn set_targets(
        &mut self,
        registry: &CodeRegistry,
        guild_id: u64,
        aliases: &[String],
    ) -> Result<Vec<String>, SettingsError> {
        if aliases.is_empty() {
            return Err(SettingsError::Empty);
        }
        validate_all(registry, aliases)?;

        self.targets.insert(guild_id, aliases.to_vec());
        Ok(aliases.to_vec())
    }

    /// Append aliases not already present. Rejects the whole batch on the first
    /// unsupported alias.
    ///
    /// # Returns
    /// The aliases actually appended (may be empty if all were present).
    pub fn add_targets(
        &mut self,
        registry: &CodeRegistry,
        guild_id: u64,
        aliases: &[String],
    ) -> Result<Vec<String>, SettingsError> {
        if aliases.is_empty() {
            return Err(SettingsError::Empty);
        }
        validate_all(registry, aliases)?;

        let mut current = self.get_targets(guild_id);
        let mut added = Vec::new();
        for alias in aliases {
            if !contains_alias(&current, alias) {
                current.push(alias.clone());
                added.push(alias.clone());
            }
        }

        self.targets.insert(guild_id, current);
        Ok(added)
    }

    /// Remove one alias from a guild's targets.
    ///
    /// Every stored spelling of the same normalized alias is removed. Reports
    /// `AliasNotPresent` and changes nothing if it is not configured.
    pub fn remove_target(&mut self, guild_id: u64, alias: &str) -> Result<Vec<String>, SettingsError> {
        let mut current = self.get_targets(guild_id);
        let key = normalize(alias);
        let before = current.len();
        current.retain(|existing| normalize(existing) != key);

        if current.len() == before {
            return Err(SettingsError::AliasNotPresent(alias.to_string()));
        }

        self.targets.insert(guild_id, current.clone());
        Ok(current)
    }
}

fn validate_all(registry: &CodeRegistry, aliases: &[String]) -> Result<(), SettingsError> {
    match aliases.iter().find(|alias| !registry.is_supported(alias)) {
        Some(invalid) => Err(SettingsError::UnsupportedLanguage(invalid.clone())),
        None => Ok(()),
    }
}

fn contains_alias(list: &[String], alias: &str) -> bool {
    let key = normalize(alias);
    list.iter().any(|existing| normalize(existing) == key)
}
