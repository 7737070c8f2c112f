use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::detection::{contains_cjk, detect_source};
use crate::languages::{CodeRegistry, LanguageCode};
use crate::provider::{ProviderError, TranslationProvider};

/// Source forced on the single retry when CJK text comes back untranslated.
pub const FALLBACK_SOURCE: &str = "zh-CN";

/// One translated line of a reply, in configured target order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedEntry {
    /// Target alias as configured for the guild
    pub alias: String,

    /// Human-readable label for the target
    pub label: String,

    /// Translated text, or the original text if translation failed
    pub text: String,
}

/// Routes text through the provider for each configured target language.
///
/// Never fails: every error path returns the original text so the user sees
/// their own message rather than an error.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<CodeRegistry>,
    provider: Arc<dyn TranslationProvider>,
}

impl Dispatcher {
    pub fn new(registry: Arc<CodeRegistry>, provider: Arc<dyn TranslationProvider>) -> Self {
        Self { registry, provider }
    }

    pub fn registry(&self) -> &CodeRegistry {
        &self.registry
    }

    /// Translate `text` into the language named by `target_alias`.
    ///
    /// Callers filter out empty and whitespace-only text before dispatching.
    pub async fn translate(&self, text: &str, target_alias: &str) -> String {
        let Some(target) = self.registry.resolve(target_alias) else {
            debug!("Unsupported target '{}', returning original text", target_alias);
            return text.to_string();
        };

        let detected = detect_source(self.provider.as_ref(), text).await;
        let source = self
            .registry
            .resolve(&detected)
            .unwrap_or_else(LanguageCode::auto);

        let translated = match self
            .provider
            .translate(text, source.as_str(), target.as_str())
            .await
        {
            Ok(translated) => translated,
            Err(e) => {
                log_provider_error(&e, source.as_str(), target.as_str());
                return text.to_string();
            }
        };

        if needs_fallback(text, &translated, &source) {
            debug!(
                "Translation {} -> {} came back unchanged, retrying from {}",
                source, target, FALLBACK_SOURCE
            );
            return match self
                .provider
                .translate(text, FALLBACK_SOURCE, target.as_str())
                .await
            {
                Ok(retried) => retried,
                Err(e) => {
                    log_provider_error(&e, FALLBACK_SOURCE, target.as_str());
                    translated
                }
            };
        }

        translated
    }

    /// Translate `text` into every target, preserving target order.
    pub async fn translate_all(&self, text: &str, targets: &[String]) -> Vec<TranslatedEntry> {
        let jobs = targets.iter().map(|alias| async move {
            TranslatedEntry {
                alias: alias.clone(),
                label: self.label_for(alias),
                text: self.translate(text, alias).await,
            }
        });
        join_all(jobs).await
    }

    /// Display label for a target alias: the registry name, title-cased, or
    /// the alias itself when it does not resolve.
    pub fn label_for(&self, alias: &str) -> String {
        self.registry
            .name_of(alias)
            .map(title_case)
            .unwrap_or_else(|| alias.to_string())
    }
}

/// Whether a first-pass result is degenerate CJK output worth one retry from
/// [`FALLBACK_SOURCE`]. A pass that already used the fallback source never retries.
fn needs_fallback(original: &str, translated: &str, source: &LanguageCode) -> bool {
    translated == original && contains_cjk(original) && !source.matches(FALLBACK_SOURCE)
}

fn log_provider_error(error: &ProviderError, source: &str, target: &str) {
    if error.is_invalid_payload() {
        warn!("Rejected payload translating {} -> {}: {}", source, target, error);
    } else {
        warn!("Translation {} -> {} failed: {}", source, target, error);
    }
}

/// Uppercase the first letter of every word ("chinese (traditional)" ->
/// "Chinese (Traditional)").
fn title_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut at_word_start = true;
    for c in name.chars() {
        if at_word_start && c.is_alphabetic() {
            result.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            result.push(c);
            if c.is_whitespace() {
                at_word_start = true;
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Scripted provider recording every translate call as (source, target).
    struct ScriptedProvider {
        detect_result: Option<&'static str>,
        respond: fn(&str, &str, &str) -> Result<String, ProviderError>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedProvider {
        fn new(
            detect_result: Option<&'static str>,
            respond: fn(&str, &str, &str) -> Result<String, ProviderError>,
        ) -> Arc<Self> {
            Arc::new(Self {
                detect_result,
                respond,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TranslationProvider for ScriptedProvider {
        async fn supported_languages(&self) -> Result<BTreeMap<String, String>, ProviderError> {
            Ok(sample_languages())
        }

        async fn translate(
            &self,
            text: &str,
            source: &str,
            target: &str,
        ) -> Result<String, ProviderError> {
            self.calls
                .lock()
                .unwrap()
                .push((source.to_string(), target.to_string()));
            (self.respond)(text, source, target)
        }

        async fn detect(&self, _text: &str) -> Result<String, ProviderError> {
            self.detect_result
                .map(str::to_string)
                .ok_or_else(|| ProviderError::Malformed("detection unavailable".to_string()))
        }
    }

    fn sample_languages() -> BTreeMap<String, String> {
        [
            ("english", "en"),
            ("french", "fr"),
            ("japanese", "ja"),
            ("chinese (simplified)", "zh-CN"),
            ("chinese (traditional)", "zh-TW"),
        ]
        .into_iter()
        .map(|(name, code)| (name.to_string(), code.to_string()))
        .collect()
    }

    fn dispatcher(provider: Arc<ScriptedProvider>) -> Dispatcher {
        let registry = Arc::new(CodeRegistry::from_supported(&sample_languages()));
        Dispatcher::new(registry, provider)
    }

    fn tagged(text: &str, _source: &str, target: &str) -> Result<String, ProviderError> {
        Ok(format!("[{}] {}", target, text))
    }

    fn echo(text: &str, _source: &str, _target: &str) -> Result<String, ProviderError> {
        Ok(text.to_string())
    }

    fn echo_unless_simplified(
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, ProviderError> {
        if source == FALLBACK_SOURCE {
            Ok(format!("[{}] {}", target, text))
        } else {
            Ok(text.to_string())
        }
    }

    fn always_fails(_: &str, _: &str, _: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Api {
            status: 503,
            body: "unavailable".to_string(),
        })
    }

    fn invalid_payload(_: &str, _: &str, _: &str) -> Result<String, ProviderError> {
        Err(ProviderError::InvalidPayload("too long".to_string()))
    }

    fn echo_then_fail(text: &str, source: &str, _: &str) -> Result<String, ProviderError> {
        if source == FALLBACK_SOURCE {
            Err(ProviderError::Malformed("retry failed".to_string()))
        } else {
            Ok(text.to_string())
        }
    }

    // ==================== Target Resolution Tests ====================

    #[tokio::test]
    async fn test_unsupported_target_returns_text_without_provider_call() {
        let provider = ScriptedProvider::new(Some("en"), tagged);
        let dispatcher = dispatcher(provider.clone());

        assert_eq!(dispatcher.translate("Hello", "klingon").await, "Hello");
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_target_alias_is_normalized() {
        let provider = ScriptedProvider::new(Some("en"), tagged);
        let dispatcher = dispatcher(provider.clone());

        let result = dispatcher.translate("Hello", "ZH_tw").await;
        assert_eq!(result, "[zh-TW] Hello");
        assert_eq!(provider.calls(), vec![("en".to_string(), "zh-TW".to_string())]);
    }

    // ==================== Source Resolution Tests ====================

    #[tokio::test]
    async fn test_cjk_source_uses_traditional_chinese() {
        let provider = ScriptedProvider::new(Some("ja"), tagged);
        let dispatcher = dispatcher(provider.clone());

        assert_eq!(dispatcher.translate("你好", "en").await, "[en] 你好");
        assert_eq!(provider.calls(), vec![("zh-TW".to_string(), "en".to_string())]);
    }

    #[tokio::test]
    async fn test_unknown_detected_language_becomes_auto() {
        let provider = ScriptedProvider::new(Some("xx"), tagged);
        let dispatcher = dispatcher(provider.clone());

        dispatcher.translate("Hello", "fr").await;
        assert_eq!(provider.calls(), vec![("auto".to_string(), "fr".to_string())]);
    }

    #[tokio::test]
    async fn test_detection_failure_becomes_auto() {
        let provider = ScriptedProvider::new(None, tagged);
        let dispatcher = dispatcher(provider.clone());

        assert_eq!(dispatcher.translate("Hello", "fr").await, "[fr] Hello");
        assert_eq!(provider.calls(), vec![("auto".to_string(), "fr".to_string())]);
    }

    #[tokio::test]
    async fn test_target_equal_to_source_still_calls_provider() {
        let provider = ScriptedProvider::new(Some("en"), tagged);
        let dispatcher = dispatcher(provider.clone());

        dispatcher.translate("Hello", "en").await;
        assert_eq!(provider.calls().len(), 1);
    }

    // ==================== Failure Tests ====================

    #[tokio::test]
    async fn test_generic_error_returns_original_text() {
        let provider = ScriptedProvider::new(Some("en"), always_fails);
        let dispatcher = dispatcher(provider.clone());

        assert_eq!(dispatcher.translate("Hello", "fr").await, "Hello");
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_payload_returns_original_text() {
        let provider = ScriptedProvider::new(Some("en"), invalid_payload);
        let dispatcher = dispatcher(provider.clone());

        assert_eq!(dispatcher.translate("Hello", "fr").await, "Hello");
    }

    #[tokio::test]
    async fn test_cjk_provider_error_does_not_retry() {
        let provider = ScriptedProvider::new(None, always_fails);
        let dispatcher = dispatcher(provider.clone());

        assert_eq!(dispatcher.translate("你好", "en").await, "你好");
        assert_eq!(provider.calls().len(), 1);
    }

    // ==================== Degenerate Output Fallback Tests ====================

    #[tokio::test]
    async fn test_unchanged_cjk_output_retries_from_simplified() {
        let provider = ScriptedProvider::new(None, echo_unless_simplified);
        let dispatcher = dispatcher(provider.clone());

        assert_eq!(dispatcher.translate("你好", "en").await, "[en] 你好");
        assert_eq!(
            provider.calls(),
            vec![
                ("zh-TW".to_string(), "en".to_string()),
                ("zh-CN".to_string(), "en".to_string()),
            ]
        );
    }

    #[test]
    fn test_needs_fallback_skips_simplified_source() {
        let simplified = LanguageCode::new("zh-CN");
        assert!(!needs_fallback("汉字", "汉字", &simplified));
        assert!(!needs_fallback("汉字", "汉字", &LanguageCode::new("zh-cn")));

        let traditional = LanguageCode::new("zh-TW");
        assert!(needs_fallback("汉字", "汉字", &traditional));
        assert!(needs_fallback("汉字", "汉字", &LanguageCode::auto()));
        assert!(!needs_fallback("汉字", "Chinese characters", &traditional));
        assert!(!needs_fallback("OK", "OK", &traditional));
    }

    #[tokio::test]
    async fn test_fallback_retries_only_once() {
        let provider = ScriptedProvider::new(None, echo);
        let dispatcher = dispatcher(provider.clone());

        assert_eq!(dispatcher.translate("你好", "zh-TW").await, "你好");
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_retry_keeps_first_output() {
        let provider = ScriptedProvider::new(None, echo_then_fail);
        let dispatcher = dispatcher(provider.clone());

        assert_eq!(dispatcher.translate("你好", "en").await, "你好");
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_unchanged_latin_output_does_not_retry() {
        let provider = ScriptedProvider::new(Some("en"), echo);
        let dispatcher = dispatcher(provider.clone());

        assert_eq!(dispatcher.translate("OK", "fr").await, "OK");
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_translate_is_deterministic_against_echo_stub() {
        let provider = ScriptedProvider::new(Some("en"), echo);
        let dispatcher = dispatcher(provider);

        let first = dispatcher.translate("Hello there", "ja").await;
        let second = dispatcher.translate("Hello there", "ja").await;
        assert_eq!(first, second);
    }

    // ==================== translate_all Tests ====================

    #[tokio::test]
    async fn test_translate_all_preserves_target_order() {
        let provider = ScriptedProvider::new(Some("en"), tagged);
        let dispatcher = dispatcher(provider);

        let targets = vec!["zh-TW".to_string(), "en".to_string(), "klingon".to_string()];
        let entries = dispatcher.translate_all("Hello", &targets).await;

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].alias, "zh-TW");
        assert_eq!(entries[0].label, "Chinese (Traditional)");
        assert_eq!(entries[0].text, "[zh-TW] Hello");
        assert_eq!(entries[1].label, "English");
        assert_eq!(entries[1].text, "[en] Hello");
        assert_eq!(entries[2].label, "klingon");
        assert_eq!(entries[2].text, "Hello");
    }

    #[tokio::test]
    async fn test_translate_all_empty_targets() {
        let provider = ScriptedProvider::new(Some("en"), tagged);
        let dispatcher = dispatcher(provider.clone());

        assert!(dispatcher.translate_all("Hello", &[]).await.is_empty());
        assert!(provider.calls().is_empty());
    }

    // ==================== Label Tests ====================

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("english"), "English");
        assert_eq!(title_case("chinese (traditional)"), "Chinese (Traditional)");
        assert_eq!(title_case("haitian creole"), "Haitian Creole");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_label_for_alias_variants() {
        let dispatcher = dispatcher(ScriptedProvider::new(None, echo));
        assert_eq!(dispatcher.label_for("zh_cn"), "Chinese (Simplified)");
        assert_eq!(dispatcher.label_for("auto"), "auto");
    }
}
