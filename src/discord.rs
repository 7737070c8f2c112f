//! Discord gateway glue.
//!
//! Maps serenity events onto the platform-independent core: prefix commands go
//! to [`commands::execute`], every other non-blank guild message is translated
//! into the guild's targets and answered with an embed.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use serenity::async_trait;
use serenity::builder::{CreateEmbed, CreateEmbedAuthor, CreateMessage, EditRole};
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::guild::Guild;
use serenity::model::id::{GuildId, RoleId};
use serenity::model::permissions::Permissions;
use serenity::model::Timestamp;
use serenity::prelude::*;
use tracing::{debug, info, warn};

use crate::commands::{self, Command, Invoker};
use crate::embed::TranslationEmbed;
use crate::state::AppState;
use crate::strings;

/// Build a Discord client wired to the translation core.
pub async fn build_client(state: Arc<AppState>) -> Result<Client> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let token = state.config.discord_token.clone();
    Client::builder(&token, intents)
        .event_handler(Handler { state })
        .await
        .context("Failed to create Discord client")
}

pub struct Handler {
    state: Arc<AppState>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            "{} is online in {} guilds",
            ready.user.name,
            ready.guilds.len()
        );
    }

    async fn guild_create(&self, ctx: Context, guild: Guild, _is_new: Option<bool>) {
        ensure_translator_role(&ctx, &guild, &self.state.config.translator_role).await;
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let prefix = self.state.config.command_prefix.as_str();
        if msg.content.trim_start().starts_with(prefix) {
            if let Some(command) = Command::parse(&msg.content, prefix) {
                self.run_command(&ctx, &msg, command).await;
            }
            return;
        }

        let Some(guild_id) = msg.guild_id else {
            return;
        };
        if msg.content.trim().is_empty() {
            return;
        }

        self.translate_message(&ctx, &msg, guild_id).await;
    }
}

impl Handler {
    async fn run_command(&self, ctx: &Context, msg: &Message, command: Command) {
        let Some(guild_id) = msg.guild_id else {
            send_replies(ctx, msg, &[strings::GUILD_ONLY.to_string()]).await;
            return;
        };

        let invoker = if command.is_gated() {
            match resolve_invoker(ctx, guild_id, msg).await {
                Ok(invoker) => invoker,
                Err(e) => {
                    // Without member data nobody is privileged
                    warn!("Failed to resolve permissions in guild {}: {}", guild_id, e);
                    Invoker::default()
                }
            }
        } else {
            Invoker::default()
        };

        info!(
            "Command {:?} from {} in guild {}",
            command, msg.author.name, guild_id
        );
        let replies = commands::execute(&self.state, guild_id.get(), &invoker, command).await;
        send_replies(ctx, msg, &replies).await;
    }

    async fn translate_message(&self, ctx: &Context, msg: &Message, guild_id: GuildId) {
        debug!("Translating message {} in guild {}", msg.id, guild_id);
        let entries = self
            .state
            .translate_for_guild(guild_id.get(), &msg.content)
            .await;
        if entries.is_empty() {
            return;
        }

        let author_name = msg
            .member
            .as_ref()
            .and_then(|member| member.nick.clone())
            .or_else(|| msg.author.global_name.clone())
            .unwrap_or_else(|| msg.author.name.clone());
        let timestamp = DateTime::<Utc>::from_timestamp(msg.timestamp.unix_timestamp(), 0)
            .unwrap_or_else(Utc::now);

        let card = TranslationEmbed::new(
            &msg.content,
            &author_name,
            Some(msg.author.face()),
            timestamp,
            &entries,
        );

        let message = CreateMessage::new().embed(to_discord_embed(&card));
        if let Err(e) = msg.channel_id.send_message(ctx, message).await {
            warn!("Failed to send translation to channel {}: {}", msg.channel_id, e);
        }
    }
}

/// Work out whether the author may change settings: guild owner,
/// Administrator or Manage Server through any role, plus their role names.
async fn resolve_invoker(
    ctx: &Context,
    guild_id: GuildId,
    msg: &Message,
) -> serenity::Result<Invoker> {
    let guild = guild_id.to_partial_guild(&ctx.http).await?;
    let member = guild_id.member(ctx, msg.author.id).await?;

    // @everyone shares the guild's id
    let mut permissions = guild
        .roles
        .get(&RoleId::new(guild_id.get()))
        .map(|role| role.permissions)
        .unwrap_or_else(Permissions::empty);
    let mut roles = Vec::with_capacity(member.roles.len());
    for role_id in &member.roles {
        if let Some(role) = guild.roles.get(role_id) {
            permissions |= role.permissions;
            roles.push(role.name.clone());
        }
    }

    let elevated = guild.owner_id == msg.author.id
        || permissions.intersects(Permissions::ADMINISTRATOR | Permissions::MANAGE_GUILD);

    Ok(Invoker { elevated, roles })
}

/// Create the translator role in a guild that does not have it yet.
async fn ensure_translator_role(ctx: &Context, guild: &Guild, role_name: &str) {
    if role_name.is_empty() || guild.roles.values().any(|role| role.name == role_name) {
        return;
    }

    match guild
        .id
        .create_role(ctx, EditRole::new().name(role_name))
        .await
    {
        Ok(role) => info!("Created role '{}' ({}) in guild {}", role.name, role.id, guild.id),
        Err(e) => warn!(
            "Could not create role '{}' in guild {}: {}",
            role_name, guild.id, e
        ),
    }
}

async fn send_replies(ctx: &Context, msg: &Message, replies: &[String]) {
    for reply in replies {
        if let Err(e) = msg.channel_id.say(&ctx.http, reply).await {
            warn!("Failed to send reply to channel {}: {}", msg.channel_id, e);
            return;
        }
    }
}

fn to_discord_embed(card: &TranslationEmbed) -> CreateEmbed {
    let mut author = CreateEmbedAuthor::new(&card.author_name);
    if let Some(icon) = &card.author_icon {
        author = author.icon_url(icon);
    }

    let mut embed = CreateEmbed::new()
        .title(&card.title)
        .description(&card.description)
        .color(card.color)
        .author(author)
        .fields(
            card.fields
                .iter()
                .map(|field| (field.name.clone(), field.value.clone(), field.inline)),
        );

    if let Ok(timestamp) = Timestamp::from_unix_timestamp(card.timestamp.timestamp()) {
        embed = embed.timestamp(timestamp);
    }
    embed
}
