use std::sync::Arc;

use anyhow::{bail, Context, Result};
use guild_translator::{
    config::Config, discord, google::GoogleTranslator, languages::CodeRegistry,
    provider::TranslationProvider, state::AppState, translation::Dispatcher,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when variables come from the environment)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("guild_translator=info".parse()?),
        )
        .init();

    info!("Starting translation bot");

    // Load configuration from environment
    let config = Config::from_env()?;

    // Step 1: Load the provider's supported languages once
    let provider = Arc::new(GoogleTranslator::new(
        &config.translate_api_url,
        config.translate_timeout,
    )?);
    let supported = provider
        .supported_languages()
        .await
        .context("Failed to load supported languages")?;
    let registry = Arc::new(CodeRegistry::from_supported(&supported));
    info!("Loaded {} supported languages", registry.len());

    if let Some(invalid) = config
        .default_targets
        .iter()
        .find(|alias| !registry.is_supported(alias))
    {
        bail!("DEFAULT_TARGET_LANGUAGES contains unsupported language '{}'", invalid);
    }

    // Step 2: Wire the dispatcher and per-guild settings
    let dispatcher = Dispatcher::new(registry, provider);
    info!("Default targets: {:?}", config.default_targets);
    let state = AppState::new(config, dispatcher);

    // Step 3: Connect to Discord and run until the gateway shuts down
    let mut client = discord::build_client(state).await?;
    client
        .start()
        .await
        .context("Discord client stopped with an error")?;

    Ok(())
}
