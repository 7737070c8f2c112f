//! Prefix commands for configuring a guild's translation languages.
//!
//! Parsing, permission gating and execution are independent of the chat
//! platform: [`execute`] returns the reply messages and the Discord layer only
//! sends them.

use tracing::info;

use crate::settings::SettingsError;
use crate::state::AppState;
use crate::strings::{self, render};

/// Discord rejects messages longer than this.
pub const MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the guild's targets
    SetLang(Vec<String>),
    /// Append targets
    AddLang(Vec<String>),
    /// Remove one target
    RemoveLang(Option<String>),
    /// List every supported code
    ListLangs,
    /// Show the guild's current targets
    Langs,
    Help,
}

impl Command {
    /// Parse a message as a command.
    ///
    /// Returns `None` if the message does not start with `prefix` or names an
    /// unknown command (it may be meant for another bot).
    pub fn parse(content: &str, prefix: &str) -> Option<Command> {
        let rest = content.trim().strip_prefix(prefix)?;
        let mut words = rest.split_whitespace();
        let name = words.next()?.to_lowercase();
        let args: Vec<String> = words.map(str::to_string).collect();

        match name.as_str() {
            "setlang" => Some(Command::SetLang(args)),
            "addlang" => Some(Command::AddLang(args)),
            "rmlang" => Some(Command::RemoveLang(args.into_iter().next())),
            "listlangs" => Some(Command::ListLangs),
            "langs" => Some(Command::Langs),
            "help" => Some(Command::Help),
            _ => None,
        }
    }

    /// Whether the command mutates settings and needs a privileged invoker.
    pub fn is_gated(&self) -> bool {
        matches!(
            self,
            Command::SetLang(_) | Command::AddLang(_) | Command::RemoveLang(_)
        )
    }
}

/// What the platform layer knows about the member running a command.
#[derive(Debug, Clone, Default)]
pub struct Invoker {
    /// Guild owner, Administrator or Manage Server
    pub elevated: bool,

    /// Names of the member's roles
    pub roles: Vec<String>,
}

impl Invoker {
    pub fn is_privileged(&self, required_role: &str) -> bool {
        self.elevated || self.roles.iter().any(|role| role == required_role)
    }
}

/// Run a command for a guild and produce the reply messages.
pub async fn execute(
    state: &AppState,
    guild_id: u64,
    invoker: &Invoker,
    command: Command,
) -> Vec<String> {
    let prefix = state.config.command_prefix.as_str();
    let role = state.config.translator_role.as_str();

    if command.is_gated() && !invoker.is_privileged(role) {
        info!("Denied {:?} in guild {}: invoker lacks permission", command, guild_id);
        return vec![render(strings::PERMISSION_DENIED, &[("role", role)])];
    }

    match command {
        Command::SetLang(aliases) if aliases.is_empty() => {
            vec![render(strings::SETLANG_USAGE, &[("prefix", prefix)])]
        }
        Command::SetLang(aliases) => {
            let result =
                state
                    .settings
                    .write()
                    .await
                    .set_targets(state.registry(), guild_id, &aliases);
            match result {
                Ok(targets) => {
                    info!("Guild {} targets set to {:?}", guild_id, targets);
                    let languages = strings::format_languages(&targets);
                    vec![render(strings::SET_SUCCESS, &[("languages", &languages)])]
                }
                Err(e) => vec![settings_error_reply(&e, prefix)],
            }
        }
        Command::AddLang(aliases) if aliases.is_empty() => {
            vec![render(strings::ADDLANG_USAGE, &[("prefix", prefix)])]
        }
        Command::AddLang(aliases) => {
            let mut settings = state.settings.write().await;
            let result = settings.add_targets(state.registry(), guild_id, &aliases);
            let languages = strings::format_languages(&settings.get_targets(guild_id));
            drop(settings);

            match result {
                Ok(added) if added.is_empty() => {
                    vec![render(strings::ADD_NOTHING_NEW, &[("languages", &languages)])]
                }
                Ok(added) => {
                    info!("Guild {} added targets {:?}", guild_id, added);
                    let added = strings::format_languages(&added);
                    vec![render(
                        strings::ADD_SUCCESS,
                        &[("added", &added), ("languages", &languages)],
                    )]
                }
                Err(e) => vec![settings_error_reply(&e, prefix)],
            }
        }
        Command::RemoveLang(None) => {
            vec![render(strings::RMLANG_USAGE, &[("prefix", prefix)])]
        }
        Command::RemoveLang(Some(alias)) => {
            let result = state.settings.write().await.remove_target(guild_id, &alias);
            match result {
                Ok(remaining) => {
                    info!("Guild {} removed target {}", guild_id, alias);
                    let languages = strings::format_languages(&remaining);
                    vec![render(
                        strings::REMOVE_SUCCESS,
                        &[("removed", &alias), ("languages", &languages)],
                    )]
                }
                Err(e) => vec![settings_error_reply(&e, prefix)],
            }
        }
        Command::ListLangs => list_languages(state),
        Command::Langs => {
            let targets = state.settings.read().await.get_targets(guild_id);
            let languages = strings::format_languages(&targets);
            vec![render(strings::CURRENT_LANGUAGES, &[("languages", &languages)])]
        }
        Command::Help => vec![render(strings::HELP, &[("prefix", prefix), ("role", role)])],
    }
}

fn settings_error_reply(error: &SettingsError, prefix: &str) -> String {
    match error {
        SettingsError::UnsupportedLanguage(alias) => render(
            strings::UNSUPPORTED_LANGUAGE,
            &[("alias", alias), ("prefix", prefix)],
        ),
        SettingsError::AliasNotPresent(alias) => {
            render(strings::REMOVE_NOT_PRESENT, &[("alias", alias)])
        }
        SettingsError::Empty => render(strings::SETLANG_USAGE, &[("prefix", prefix)]),
    }
}

/// Every supported language as `code` - Name lines, split into messages that
/// fit Discord's length limit.
fn list_languages(state: &AppState) -> Vec<String> {
    let registry = state.registry();
    let header = render(
        strings::LIST_HEADER,
        &[("count", &registry.len().to_string())],
    );
    let lines = registry.entries().iter().map(|entry| {
        format!(
            "`{}` - {}",
            entry.code,
            state.dispatcher.label_for(&entry.code)
        )
    });

    chunk_lines(std::iter::once(header).chain(lines), MAX_MESSAGE_CHARS)
}

/// Pack lines into messages of at most `limit` characters each.
pub fn chunk_lines(lines: impl IntoIterator<Item = String>, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in lines {
        let needed = if current.is_empty() {
            line.chars().count()
        } else {
            current.chars().count() + 1 + line.chars().count()
        };
        if needed > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(&line);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
