//! User-facing reply templates.
//!
//! Placeholders are written as `{name}` and filled with [`render`]. Strings
//! are plain Discord markdown.

// ==================== Translation Embed ====================

/// Title of the translation embed
pub const EMBED_TITLE: &str = "🌐 Translate";

/// Accent colour of the translation embed
pub const EMBED_COLOR: u32 = 0x2ecc71;

// ==================== Permission Messages ====================

/// Shown when a non-privileged member runs a gated command
/// Placeholders: {role}
pub const PERMISSION_DENIED: &str =
    "⛔ You need the **Manage Server** permission or the `{role}` role to change languages.";

/// Shown when a command is used outside a server
pub const GUILD_ONLY: &str = "This command only works inside a server.";

// ==================== Language Settings Messages ====================

/// Shown after `setlang` succeeds
/// Placeholders: {languages}
pub const SET_SUCCESS: &str = "✅ Translation languages set to: {languages}";

/// Shown after `addlang` appended at least one language
/// Placeholders: {added}, {languages}
pub const ADD_SUCCESS: &str = "✅ Added {added}. Now translating to: {languages}";

/// Shown after `addlang` when every language was already configured
/// Placeholders: {languages}
pub const ADD_NOTHING_NEW: &str = "ℹ️ Those languages are already configured: {languages}";

/// Shown after `rmlang` succeeds
/// Placeholders: {removed}, {languages}
pub const REMOVE_SUCCESS: &str = "✅ Removed `{removed}`. Now translating to: {languages}";

/// Shown when `rmlang` names a language that is not configured
/// Placeholders: {alias}
pub const REMOVE_NOT_PRESENT: &str = "⚠️ `{alias}` is not in this server's language list.";

/// Shown when a configuration command names an unknown language
/// Placeholders: {alias}, {prefix}
pub const UNSUPPORTED_LANGUAGE: &str =
    "❌ Unsupported language `{alias}`. Use `{prefix}listlangs` to see every supported code.";

/// Current targets of the guild
/// Placeholders: {languages}
pub const CURRENT_LANGUAGES: &str = "🌐 This server translates to: {languages}";

/// Rendered in place of an empty language list
pub const NO_LANGUAGES: &str = "(none)";

/// Header of the `listlangs` output
/// Placeholders: {count}
pub const LIST_HEADER: &str = "**Supported languages ({count})**";

// ==================== Usage Messages ====================

/// Placeholders: {prefix}
pub const SETLANG_USAGE: &str = "Usage: `{prefix}setlang <code> [code...]`, e.g. `{prefix}setlang zh-TW en ja`";

/// Placeholders: {prefix}
pub const ADDLANG_USAGE: &str = "Usage: `{prefix}addlang <code> [code...]`, e.g. `{prefix}addlang ko`";

/// Placeholders: {prefix}
pub const RMLANG_USAGE: &str = "Usage: `{prefix}rmlang <code>`, e.g. `{prefix}rmlang en`";

/// Placeholders: {prefix}, {role}
pub const HELP: &str = "**Translation bot**\n\
Every message in this server is translated into the configured languages.\n\n\
`{prefix}langs` show this server's languages\n\
`{prefix}listlangs` list every supported language code\n\
`{prefix}setlang <code>...` replace the language list\n\
`{prefix}addlang <code>...` add languages\n\
`{prefix}rmlang <code>` remove a language\n\n\
Changing languages requires **Manage Server** or the `{role}` role.";

/// Fill `{name}` placeholders in a template.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{}}}", key), value)
    })
}

/// Format a language list as inline code spans: `zh-TW`, `en`.
pub fn format_languages(aliases: &[String]) -> String {
    if aliases.is_empty() {
        return NO_LANGUAGES.to_string();
    }
    aliases
        .iter()
        .map(|alias| format!("`{}`", alias))
        .collect::<Vec<_>>()
        .join(", ")
}
