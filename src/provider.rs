//! Translation provider interface.
//!
//! The dispatcher only needs three capabilities from an upstream translator:
//! list its languages once at startup, translate a piece of text and detect
//! the language of a piece of text. Implementations may pool connections
//! internally; callers treat the provider as stateless.

use std::collections::BTreeMap;

use async_trait::async_trait;

/// Maximum number of characters a provider accepts in a single request.
pub const MAX_PAYLOAD_CHARS: usize = 5000;

/// Errors a translation provider can report.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The text was rejected before it was sent (empty, too long)
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The request could not be sent or timed out
    #[error("translation request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("translation API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The provider answered with a body we could not interpret
    #[error("unexpected translation response: {0}")]
    Malformed(String),
}

impl ProviderError {
    pub fn is_invalid_payload(&self) -> bool {
        matches!(self, ProviderError::InvalidPayload(_))
    }
}

/// Upstream translation capability.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Supported languages as display name -> canonical code.
    async fn supported_languages(&self) -> Result<BTreeMap<String, String>, ProviderError>;

    /// Translate `text` from `source` (a code or `auto`) into `target`.
    async fn translate(&self, text: &str, source: &str, target: &str)
        -> Result<String, ProviderError>;

    /// Detect the language of `text`, returning the provider's code.
    async fn detect(&self, text: &str) -> Result<String, ProviderError>;
}

/// Reject payloads the upstream would refuse anyway.
pub fn validate_payload(text: &str) -> Result<(), ProviderError> {
    if text.trim().is_empty() {
        return Err(ProviderError::InvalidPayload(
            "text is empty or whitespace only".to_string(),
        ));
    }
    let chars = text.chars().count();
    if chars > MAX_PAYLOAD_CHARS {
        return Err(ProviderError::InvalidPayload(format!(
            "text is {} characters, limit is {}",
            chars, MAX_PAYLOAD_CHARS
        )));
    }
    Ok(())
}
