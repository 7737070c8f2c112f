//! Source language detection.
//!
//! A cheap script check runs first: any CJK Unified Ideograph short-circuits
//! to Traditional Chinese without calling the provider. This is a heuristic
//! override, not a script or dialect detector; Simplified text is reported as
//! `zh-tw` too, and the dispatcher's fallback covers the cases where that
//! guess makes the provider refuse to translate.

use tracing::{debug, warn};

use crate::languages::AUTO;
use crate::provider::TranslationProvider;

/// Code returned for any text containing a CJK ideograph.
pub const CJK_SOURCE_CODE: &str = "zh-tw";

/// Whether a character is in the CJK Unified Ideographs block (U+4E00..=U+9FFF).
pub fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Whether any character of `text` is a CJK Unified Ideograph.
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(is_cjk_ideograph)
}

/// Decide the source language of `text`.
///
/// Returns a lowercased provider code, or `"auto"` when the provider cannot
/// tell. Detection failures are logged and never propagated.
pub async fn detect_source(provider: &dyn TranslationProvider, text: &str) -> String {
    if contains_cjk(text) {
        debug!("CJK ideograph found, assuming {}", CJK_SOURCE_CODE);
        return CJK_SOURCE_CODE.to_string();
    }

    match provider.detect(text).await {
        Ok(code) => code.to_lowercase(),
        Err(e) => {
            warn!("Language detection failed, falling back to auto: {}", e);
            AUTO.to_string()
        }
    }
}
