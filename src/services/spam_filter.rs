use std::sync::LazyLock;

use regex::Regex;

use crate::{
    app::config::SpamConfig,
    models::spam::{SpamCheck, SpamReason},
};

static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("link pattern is valid"));

/// Passes when the hidden field was left blank. Humans never see it.
pub fn check_honeypot(value: Option<&str>) -> SpamCheck {
    match value {
        Some(value) if !value.trim().is_empty() => SpamCheck::rejected(SpamReason::Honeypot),
        _ => SpamCheck::passed(),
    }
}

pub fn count_links(content: &str) -> usize {
    LINK_REGEX.find_iter(content).count()
}

/// Stateless content classifier for public comments.
#[derive(Debug, Clone)]
pub struct SpamFilter {
    forbidden_words: Vec<String>,
    min_length: usize,
    max_length: usize,
    max_links: usize,
}

impl Default for SpamFilter {
    fn default() -> Self {
        Self::from_config(&SpamConfig::default())
    }
}

impl SpamFilter {
    pub fn from_config(config: &SpamConfig) -> Self {
        Self {
            forbidden_words: config
                .forbidden_words
                .iter()
                .map(|word| word.trim().to_lowercase())
                .filter(|word| !word.is_empty())
                .collect(),
            min_length: config.min_length,
            max_length: config.max_length,
            max_links: config.max_links,
        }
    }

    /// Length floor, length ceiling, forbidden words, link count. First
    /// failure wins. Length is counted in characters, whitespace included.
    ///
    /// A character here is a Unicode scalar value (`str::chars`), not a byte
    /// or a UTF-16 code unit, so an emoji outside the BMP counts once.
    pub fn filter_content(&self, content: &str) -> SpamCheck {
        let length = content.chars().count();
        if length < self.min_length {
            return SpamCheck::rejected(SpamReason::ContentTooShort);
        }
        if length > self.max_length {
            return SpamCheck::rejected(SpamReason::ContentTooLong);
        }

        let lowered = content.to_lowercase();
        if self
            .forbidden_words
            .iter()
            .any(|word| lowered.contains(word.as_str()))
        {
            return SpamCheck::rejected(SpamReason::ForbiddenWord);
        }

        if count_links(content) > self.max_links {
            return SpamCheck::rejected(SpamReason::TooManyLinks);
        }

        SpamCheck::passed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(check: SpamCheck) -> Option<SpamReason> {
        check.reason
    }

    #[test]
    fn honeypot_passes_when_blank() {
        assert!(check_honeypot(None).pass);
        assert!(check_honeypot(Some("")).pass);
        assert!(check_honeypot(Some("   ")).pass);
        assert!(check_honeypot(Some("\t\n")).pass);
    }

    #[test]
    fn honeypot_fails_on_any_content() {
        for value in ["bot", " x ", "http://example.com", "0"] {
            assert_eq!(
                check_honeypot(Some(value)),
                SpamCheck::rejected(SpamReason::Honeypot),
                "value {value:?}"
            );
        }
    }

    #[test]
    fn length_boundaries() {
        let filter = SpamFilter::default();
        assert_eq!(reason(filter.filter_content("")), Some(SpamReason::ContentTooShort));
        assert_eq!(reason(filter.filter_content("a")), Some(SpamReason::ContentTooShort));
        assert_eq!(reason(filter.filter_content(" ")), Some(SpamReason::ContentTooShort));
        assert!(filter.filter_content("ok").pass);
        assert!(filter.filter_content("  ").pass);
        assert!(filter.filter_content(&"a".repeat(5000)).pass);
        assert_eq!(
            reason(filter.filter_content(&"a".repeat(5001))),
            Some(SpamReason::ContentTooLong)
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let filter = SpamFilter::default();
        assert!(filter.filter_content("héé").pass);
        assert!(filter.filter_content(&"é".repeat(5000)).pass);
    }

    #[test]
    fn astral_characters_count_once() {
        let filter = SpamFilter::default();
        assert_eq!(reason(filter.filter_content("😀")), Some(SpamReason::ContentTooShort));
        assert!(filter.filter_content("😀😀").pass);
        assert!(filter.filter_content(&"😀".repeat(5000)).pass);
        assert_eq!(
            reason(filter.filter_content(&"😀".repeat(5001))),
            Some(SpamReason::ContentTooLong)
        );
    }

    #[test]
    fn forbidden_words_match_case_insensitive_substrings() {
        let filter = SpamFilter::default();
        assert_eq!(
            reason(filter.filter_content("Cheap VIAGRA here")),
            Some(SpamReason::ForbiddenWord)
        );
        assert_eq!(
            reason(filter.filter_content("antispammer talk")),
            Some(SpamReason::ForbiddenWord)
        );
        assert!(filter.filter_content("A perfectly fine comment").pass);
    }

    #[test]
    fn link_boundary() {
        let filter = SpamFilter::default();
        let three = "see https://a.example http://b.example https://c.example/path";
        assert!(filter.filter_content(three).pass);

        let four = format!("{three} http://d.example");
        assert_eq!(reason(filter.filter_content(&four)), Some(SpamReason::TooManyLinks));
    }

    #[test]
    fn too_short_is_reported_before_forbidden_word() {
        let filter = SpamFilter::from_config(&SpamConfig {
            forbidden_words: vec!["x".to_string()],
            ..SpamConfig::default()
        });
        assert_eq!(reason(filter.filter_content("x")), Some(SpamReason::ContentTooShort));
    }

    #[test]
    fn forbidden_word_is_reported_before_links() {
        let filter = SpamFilter::default();
        let content = "spam http://a.io http://b.io http://c.io http://d.io";
        assert_eq!(reason(filter.filter_content(content)), Some(SpamReason::ForbiddenWord));
    }

    #[test]
    fn custom_word_list_replaces_seed() {
        let filter = SpamFilter::from_config(&SpamConfig {
            forbidden_words: vec!["Casino".to_string(), "  ".to_string()],
            ..SpamConfig::default()
        });
        assert!(filter.filter_content("spam is allowed here").pass);
        assert!(!filter.filter_content("online casino").pass);
    }

    #[test]
    fn counts_links_without_overlap() {
        assert_eq!(count_links("http://a.io/http://b.io"), 1);
        assert_eq!(count_links("no links"), 0);
        assert_eq!(count_links("https://a.io, https://b.io"), 2);
    }
}
