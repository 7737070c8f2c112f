use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::languages::CodeRegistry;
use crate::settings::GuildSettings;
use crate::translation::{Dispatcher, TranslatedEntry};

/// Everything a handler needs, passed explicitly instead of through globals.
pub struct AppState {
    pub config: Config,
    pub dispatcher: Dispatcher,
    pub settings: RwLock<GuildSettings>,
}

impl AppState {
    pub fn new(config: Config, dispatcher: Dispatcher) -> Arc<Self> {
        let settings = GuildSettings::new(config.default_targets.clone());
        Arc::new(Self {
            config,
            dispatcher,
            settings: RwLock::new(settings),
        })
    }

    pub fn registry(&self) -> &CodeRegistry {
        self.dispatcher.registry()
    }

    /// Translate a message into the guild's current targets.
    ///
    /// The settings lock is released before any provider call.
    pub async fn translate_for_guild(&self, guild_id: u64, text: &str) -> Vec<TranslatedEntry> {
        let targets = self.settings.read().await.get_targets(guild_id);
        self.dispatcher.translate_all(text, &targets).await
    }
}
