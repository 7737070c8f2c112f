use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::google;
use crate::settings::DEFAULT_TARGETS;

#[derive(Debug, Clone)]
pub struct Config {
    // Discord
    pub discord_token: String,
    pub command_prefix: String,
    pub translator_role: String,

    // Languages
    pub default_targets: Vec<String>,

    // Translation provider
    pub translate_api_url: String,
    pub translate_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Discord - the only required setting
            discord_token: std::env::var("DISCORD_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty())
                .context("DISCORD_TOKEN not set")?,
            command_prefix: std::env::var("COMMAND_PREFIX")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| "!".to_string()),
            translator_role: std::env::var("TRANSLATOR_ROLE")
                .unwrap_or_else(|_| "Translator".to_string()),

            // Languages
            default_targets: default_targets_from_env(),

            // Translation provider
            translate_api_url: translate_api_url_from_env(),
            translate_timeout: translate_timeout_from_env()?,
        })
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            discord_token: "test-token".to_string(),
            command_prefix: "!".to_string(),
            translator_role: "Translator".to_string(),
            default_targets: DEFAULT_TARGETS.iter().map(|s| s.to_string()).collect(),
            translate_api_url: "http://127.0.0.1:9/translate_a/single".to_string(),
            translate_timeout: Duration::from_secs(1),
        }
    }
}

/// `DEFAULT_TARGET_LANGUAGES`, falling back to [`DEFAULT_TARGETS`] when unset
/// or empty.
pub fn default_targets_from_env() -> Vec<String> {
    std::env::var("DEFAULT_TARGET_LANGUAGES")
        .ok()
        .map(|v| parse_language_list(&v))
        .filter(|list| !list.is_empty())
        .unwrap_or_else(|| DEFAULT_TARGETS.iter().map(|s| s.to_string()).collect())
}

pub fn translate_api_url_from_env() -> String {
    std::env::var("TRANSLATE_API_URL").unwrap_or_else(|_| google::DEFAULT_API_URL.to_string())
}

/// `TRANSLATE_TIMEOUT_SECS` as a duration (default 10s). Non-numeric or zero
/// values are errors.
pub fn translate_timeout_from_env() -> Result<Duration> {
    let timeout_secs: u64 = match std::env::var("TRANSLATE_TIMEOUT_SECS") {
        Ok(v) => v
            .parse()
            .context(format!("TRANSLATE_TIMEOUT_SECS must be a number, got '{}'", v))?,
        Err(_) => 10,
    };
    if timeout_secs == 0 {
        bail!("TRANSLATE_TIMEOUT_SECS must be greater than zero");
    }
    Ok(Duration::from_secs(timeout_secs))
}

/// Split a comma- or whitespace-separated language list.
pub fn parse_language_list(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
