//! Translate text from the command line without connecting to Discord.
//!
//! Usage:
//!   cargo run --bin translate -- "你好，世界"                # default targets
//!   cargo run --bin translate -- --to ja,ko "Good morning"
//!
//! Optional environment variables:
//! - DEFAULT_TARGET_LANGUAGES (defaults to zh-TW,en)
//! - TRANSLATE_API_URL
//! - TRANSLATE_TIMEOUT_SECS (defaults to 10)

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use guild_translator::{
    config, detection::detect_source, google::GoogleTranslator, languages::CodeRegistry,
    provider::TranslationProvider, translation::Dispatcher,
};
use tracing::info;

/// Minimal config for the CLI (no Discord token required)
struct CliConfig {
    api_url: String,
    timeout: Duration,
    targets: Vec<String>,
}

impl CliConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            api_url: config::translate_api_url_from_env(),
            timeout: config::translate_timeout_from_env()?,
            targets: config::default_targets_from_env(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("guild_translator=info".parse()?),
        )
        .init();

    let mut cli = CliConfig::from_env()?;

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("--to") {
        if args.len() < 2 {
            bail!("--to needs a comma-separated list of language codes");
        }
        cli.targets = config::parse_language_list(&args[1]);
        args.drain(..2);
    }
    let text = args.join(" ");
    if text.trim().is_empty() {
        bail!("Usage: translate [--to <code,code,...>] <text>");
    }

    let provider = Arc::new(GoogleTranslator::new(&cli.api_url, cli.timeout)?);
    let supported = provider
        .supported_languages()
        .await
        .context("Failed to load supported languages")?;
    let registry = Arc::new(CodeRegistry::from_supported(&supported));

    for target in &cli.targets {
        if !registry.is_supported(target) {
            bail!("Unsupported language '{}'", target);
        }
    }

    let detected = detect_source(provider.as_ref(), &text).await;
    info!("Detected source language: {}", detected);

    let dispatcher = Dispatcher::new(registry, provider);
    let entries = dispatcher.translate_all(&text, &cli.targets).await;

    println!("\n{}\n", "=".repeat(80));
    println!("{}", text);
    println!("\n{}", "-".repeat(80));
    for entry in entries {
        println!("{} ({}): {}", entry.label, entry.alias, entry.text);
    }
    println!("{}\n", "=".repeat(80));

    Ok(())
}
