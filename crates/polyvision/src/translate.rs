//! Translation: phrases to translated phrases.

use crate::cache::{TRANSLATION_NAMESPACE, namespaced_key};
use crate::client::PolyVision;
use crate::providers::TranslateTextRequest;
use crate::types::{Phrase, TranslatedPhrase};
use crate::{PolyvisionError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static SHOUTING_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[A-Z0-9\s."',:?!*-]+$"#).expect("Upper-case text regex pattern is valid and should compile")
});

/// Sentence-case text that is entirely capitals, digits and punctuation.
///
/// OCR providers tend to report signage and headings in capitals, which
/// translation then treats as acronyms.
///
/// ```rust
/// use polyvision::translate::normalize_text;
///
/// assert_eq!(normalize_text("EMERGENCY EXIT"), "Emergency exit");
/// assert_eq!(normalize_text("Emergency EXIT"), "Emergency EXIT");
/// ```
pub fn normalize_text(text: &str) -> String {
    if !SHOUTING_TEXT.is_match(text) {
        return text.to_string();
    }

    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

impl PolyVision {
    /// Translate each phrase's text and attach it to the phrase.
    ///
    /// An empty slice returns immediately without touching the cache or the
    /// provider. With a `key`, a cached result under `translate:<key>` is
    /// returned as is, and a fresh result is stored there.
    #[tracing::instrument(skip(self, phrases), fields(phrases = phrases.len()))]
    pub async fn translate(&self, key: Option<&str>, phrases: &[Phrase]) -> Result<Vec<TranslatedPhrase>> {
        if phrases.is_empty() {
            return Ok(Vec::new());
        }

        let cache_key = key.map(|key| namespaced_key(TRANSLATION_NAMESPACE, key));

        if let Some(cache_key) = &cache_key
            && let Some(cached) = self.cache().get_typed::<Vec<TranslatedPhrase>>(cache_key).await?
        {
            debug!(cache_key = %cache_key, "translation cache hit");
            return Ok(cached);
        }

        let contents = phrases.iter().map(|phrase| normalize_text(&phrase.text())).collect();
        let request = TranslateTextRequest::new(self.translate_options(), contents);

        debug!(provider = self.translator.name(), "calling translation provider");
        let translations = self.translator.translate_text(&request).await?;

        if translations.len() != phrases.len() {
            return Err(PolyvisionError::provider(
                self.translator.name(),
                format!(
                    "expected {} translations, received {}",
                    phrases.len(),
                    translations.len()
                ),
            ));
        }

        let translated: Vec<TranslatedPhrase> = phrases
            .iter()
            .zip(translations)
            .map(|(phrase, translation)| TranslatedPhrase::new(phrase, translation.translated_text))
            .collect();

        match cache_key {
            Some(cache_key) => self.cache().set_typed(&cache_key, translated).await,
            None => Ok(translated),
        }
    }

    /// Recognize `image` and translate the resulting phrases, using `key` for
    /// both cache namespaces.
    pub async fn recognize_and_translate(&self, key: Option<&str>, image: &[u8]) -> Result<Vec<TranslatedPhrase>> {
        let phrases = self.recognize(key, image).await?;
        self.translate(key, &phrases).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_all_caps() {
        assert_eq!(normalize_text("OPEN 24 HOURS!"), "Open 24 hours!");
    }

    #[test]
    fn test_normalize_keeps_mixed_case() {
        assert_eq!(normalize_text("Open 24 Hours"), "Open 24 Hours");
        assert_eq!(normalize_text("iPhone"), "iPhone");
    }

    #[test]
    fn test_normalize_punctuation_and_digits_only() {
        assert_eq!(normalize_text("12:30 - 14:00"), "12:30 - 14:00");
    }

    #[test]
    fn test_normalize_rejects_other_symbols() {
        assert_eq!(normalize_text("SALE 50%"), "SALE 50%");
        assert_eq!(normalize_text("CAFÉ"), "CAFÉ");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_text(""), "");
    }
}
