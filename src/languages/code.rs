//! Language codes and alias normalization.
//!
//! A `LanguageCode` is a token in the translation provider's canonical code
//! space (e.g. "en", "zh-TW"), or the `auto` sentinel meaning "detect at
//! translation time". User input never becomes a `LanguageCode` directly; it
//! goes through [`normalize`] and a registry lookup first.

use std::fmt;

/// Literal used for the auto-detect sentinel.
pub const AUTO: &str = "auto";

/// A canonical language code, or the `auto` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Wrap a canonical code as reported by the provider.
    ///
    /// Only the registry should call this with provider codes; everything else
    /// should obtain codes through `CodeRegistry::resolve`.
    pub(crate) fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The auto-detect sentinel.
    pub fn auto() -> Self {
        Self(AUTO.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_auto(&self) -> bool {
        self.0 == AUTO
    }

    /// Case-insensitive comparison against a raw code string.
    pub fn matches(&self, code: &str) -> bool {
        self.0.eq_ignore_ascii_case(code)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalize a user-supplied alias into the registry's key space.
///
/// Lowercases and turns underscores into hyphens, so `ZH_tw`, `zh-TW` and
/// `zh_tw` all map to `zh-tw`. Never fails: an alias that is not a known code
/// simply has no entry in the alias table.
pub fn normalize(alias: &str) -> String {
    alias.to_lowercase().replace('_', "-")
}
