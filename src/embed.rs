//! Platform-independent model of the translation reply card.
//!
//! Discord enforces per-part length limits on embeds and a limit on the whole
//! card. Everything is cut here so the gateway layer can map the card
//! one-to-one.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::strings::{EMBED_COLOR, EMBED_TITLE};
use crate::translation::TranslatedEntry;

/// Discord limit for an embed description.
pub const MAX_DESCRIPTION_CHARS: usize = 4096;

/// Discord limit for an embed field value.
pub const MAX_FIELD_VALUE_CHARS: usize = 1024;

/// Discord limit for an embed field name.
pub const MAX_FIELD_NAME_CHARS: usize = 256;

/// Discord limit for an embed author name.
pub const MAX_AUTHOR_NAME_CHARS: usize = 256;

/// Discord limit for title, description, author name and all field names and
/// values added together.
pub const MAX_TOTAL_CHARS: usize = 6000;

/// Discord limit on fields per embed.
pub const MAX_FIELDS: usize = 25;

/// The quoted original is never cut below this when the card is over budget.
const MIN_QUOTE_CHARS: usize = 64;

const FENCE: &str = "```";

/// Discord rejects empty field values.
const EMPTY_FIELD: &str = "\u{200B}";

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationEmbed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub timestamp: DateTime<Utc>,
    pub author_name: String,
    pub author_icon: Option<String>,
    pub fields: Vec<EmbedField>,
}

impl TranslationEmbed {
    /// Build the card for an original message and its translations.
    ///
    /// Only the first [`MAX_FIELDS`] translations are shown. When the card
    /// would exceed [`MAX_TOTAL_CHARS`], the quoted original is shortened
    /// first, then the longest translations share what is left.
    pub fn new(
        original: &str,
        author_name: &str,
        author_icon: Option<String>,
        timestamp: DateTime<Utc>,
        entries: &[TranslatedEntry],
    ) -> Self {
        if entries.len() > MAX_FIELDS {
            debug!(
                "Dropping {} translations over the {} field limit",
                entries.len() - MAX_FIELDS,
                MAX_FIELDS
            );
        }

        let author_name = truncate(author_name, MAX_AUTHOR_NAME_CHARS);
        let mut quoted = truncate(
            &original.replace(FENCE, "'''"),
            MAX_DESCRIPTION_CHARS - 2 * FENCE.len(),
        );

        let mut fields: Vec<EmbedField> = entries
            .iter()
            .take(MAX_FIELDS)
            .map(|entry| EmbedField {
                name: truncate(&entry.label, MAX_FIELD_NAME_CHARS),
                value: if entry.text.trim().is_empty() {
                    EMPTY_FIELD.to_string()
                } else {
                    truncate(&entry.text, MAX_FIELD_VALUE_CHARS)
                },
                inline: true,
            })
            .collect();

        let fixed = char_len(EMBED_TITLE)
            + char_len(&author_name)
            + 2 * FENCE.len()
            + fields.iter().map(|f| char_len(&f.name)).sum::<usize>();
        let budget = MAX_TOTAL_CHARS.saturating_sub(fixed);
        let values: usize = fields.iter().map(|f| char_len(&f.value)).sum();

        if char_len(&quoted) + values > budget {
            quoted = truncate(&quoted, budget.saturating_sub(values).max(MIN_QUOTE_CHARS));

            let room = budget.saturating_sub(char_len(&quoted));
            if values > room {
                let lengths: Vec<usize> = fields.iter().map(|f| char_len(&f.value)).collect();
                let cap = fair_share(&lengths, room).max(1);
                for field in &mut fields {
                    field.value = truncate(&field.value, cap);
                }
            }
        }

        Self {
            title: EMBED_TITLE.to_string(),
            description: format!("{FENCE}{quoted}{FENCE}"),
            color: EMBED_COLOR,
            timestamp,
            author_name,
            author_icon,
            fields,
        }
    }

    /// Characters Discord counts against [`MAX_TOTAL_CHARS`].
    pub fn total_chars(&self) -> usize {
        char_len(&self.title)
            + char_len(&self.description)
            + char_len(&self.author_name)
            + self
                .fields
                .iter()
                .map(|f| char_len(&f.name) + char_len(&f.value))
                .sum::<usize>()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Largest per-item cap such that the capped lengths sum to at most `budget`.
/// Items shorter than their share keep their full length.
fn fair_share(lengths: &[usize], budget: usize) -> usize {
    let mut sorted = lengths.to_vec();
    sorted.sort_unstable();

    let mut remaining = budget;
    for (i, len) in sorted.iter().enumerate() {
        let share = remaining / (sorted.len() - i);
        if *len > share {
            return share;
        }
        remaining -= len;
    }
    usize::MAX
}

/// Cut `text` to at most `max` characters, ending with `…` if it was cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, text: &str) -> TranslatedEntry {
        TranslatedEntry {
            alias: label.to_lowercase(),
            label: label.to_string(),
            text: text.to_string(),
        }
    }

    fn timestamp() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_embed_layout() {
        let embed = TranslationEmbed::new(
            "Hello",
            "alice",
            Some("https://cdn.example.com/a.png".to_string()),
            timestamp(),
            &[entry("Chinese (Traditional)", "你好"), entry("English", "Hello")],
        );

        assert_eq!(embed.title, "🌐 Translate");
        assert_eq!(embed.description, "```Hello```");
        assert_eq!(embed.color, 0x2ecc71);
        assert_eq!(embed.author_name, "alice");
        assert_eq!(embed.fields.len(), 2);
        assert_eq!(embed.fields[0].name, "Chinese (Traditional)");
        assert_eq!(embed.fields[0].value, "你好");
        assert!(embed.fields.iter().all(|f| f.inline));
    }

    #[test]
    fn test_long_translation_is_truncated() {
        let long = "字".repeat(3000);
        let embed = TranslationEmbed::new("x", "bob", None, timestamp(), &[entry("English", &long)]);

        let value = &embed.fields[0].value;
        assert_eq!(value.chars().count(), MAX_FIELD_VALUE_CHARS);
        assert!(value.ends_with('…'));
    }

    #[test]
    fn test_long_original_fits_description() {
        let long = "a".repeat(5000);
        let embed = TranslationEmbed::new(&long, "bob", None, timestamp(), &[]);

        assert!(embed.description.chars().count() <= MAX_DESCRIPTION_CHARS);
        assert!(embed.description.starts_with("```"));
        assert!(embed.description.ends_with("…```"));
    }

    #[test]
    fn test_code_fences_in_original_cannot_break_block() {
        let embed = TranslationEmbed::new("```rust\nfn x()```", "bob", None, timestamp(), &[]);
        assert_eq!(embed.description, "```'''rust\nfn x()'''```");
    }

    #[test]
    fn test_blank_translation_uses_placeholder() {
        let embed = TranslationEmbed::new("x", "bob", None, timestamp(), &[entry("English", "  ")]);
        assert_eq!(embed.fields[0].value, "\u{200B}");
    }

    // ==================== Whole-Card Limits ====================

    #[test]
    fn test_long_message_with_four_targets_fits_total_limit() {
        let original = "o".repeat(2000);
        let entries: Vec<TranslatedEntry> = ["Japanese", "Korean", "French", "German"]
            .iter()
            .map(|label| entry(label, &"t".repeat(1500)))
            .collect();

        let embed = TranslationEmbed::new(&original, "alice", None, timestamp(), &entries);

        assert!(embed.total_chars() <= MAX_TOTAL_CHARS, "total {}", embed.total_chars());
        assert_eq!(embed.fields.len(), 4);
        // The original gives way before any translation does
        assert!(embed
            .fields
            .iter()
            .all(|f| f.value.chars().count() == MAX_FIELD_VALUE_CHARS));
        assert!(embed.description.ends_with("…```"));
    }

    #[test]
    fn test_field_count_is_capped() {
        let entries: Vec<TranslatedEntry> = (0..30)
            .map(|i| entry(&format!("Lang {}", i), &"t".repeat(1500)))
            .collect();

        let embed = TranslationEmbed::new(&"o".repeat(2000), "alice", None, timestamp(), &entries);

        assert_eq!(embed.fields.len(), MAX_FIELDS);
        assert_eq!(embed.fields[0].name, "Lang 0");
        assert_eq!(embed.fields[24].name, "Lang 24");
        assert!(embed.total_chars() <= MAX_TOTAL_CHARS, "total {}", embed.total_chars());
        assert!(embed.description.chars().count() >= MIN_QUOTE_CHARS);
    }

    #[test]
    fn test_short_translations_survive_budget_squeeze() {
        let mut entries = vec![entry("English", "Hi")];
        entries.extend((0..10).map(|i| entry(&format!("L{}", i), &"t".repeat(1000))));

        let embed = TranslationEmbed::new(&"o".repeat(3000), "bob", None, timestamp(), &entries);

        assert!(embed.total_chars() <= MAX_TOTAL_CHARS);
        assert_eq!(embed.fields[0].value, "Hi");
        assert!(embed.fields[1].value.ends_with('…'));
    }

    #[test]
    fn test_total_chars_of_small_card() {
        let embed = TranslationEmbed::new("Hello", "alice", None, timestamp(), &[entry("English", "Hello")]);
        assert_eq!(embed.description, "```Hello```");
        // title + description + author + field name + field value
        assert_eq!(embed.total_chars(), 11 + 11 + 5 + 7 + 5);
    }

    #[test]
    fn test_fair_share() {
        assert_eq!(fair_share(&[10, 10], 100), usize::MAX);
        assert_eq!(fair_share(&[100, 100], 100), 50);
        assert_eq!(fair_share(&[2, 100, 100], 102), 50);
        assert_eq!(fair_share(&[], 0), usize::MAX);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("hello world", 6), "hello…");
        assert_eq!(truncate("你好世界", 3), "你好…");
    }
}
