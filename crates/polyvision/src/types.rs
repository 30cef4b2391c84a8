//! Core data model shared by recognition and translation.

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// One word-level detection, in provider detection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrToken {
    pub value: String,
    pub locale: String,
    pub rect: Rect,
}

impl OcrToken {
    pub fn new(value: impl Into<String>, locale: impl Into<String>, rect: Rect) -> Self {
        Self {
            value: value.into(),
            locale: locale.into(),
            rect,
        }
    }
}

/// A token that has been accepted into a [`Phrase`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhrasePart {
    pub value: String,
    pub rect: Rect,
}

/// A reconstructed run of tokens sharing one locale.
///
/// `rect` is always the union of every part's rectangle and `parts` is never
/// empty for phrases produced by [`crate::phrases::reconstruct`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phrase {
    pub locale: String,
    pub rect: Rect,
    pub parts: Vec<PhrasePart>,
}

impl Phrase {
    /// Open a phrase holding a single token.
    pub fn from_token(token: OcrToken) -> Self {
        Self {
            locale: token.locale,
            rect: token.rect,
            parts: vec![PhrasePart {
                value: token.value,
                rect: token.rect,
            }],
        }
    }

    /// Append a token and grow the bounding box to cover it.
    pub fn push(&mut self, token: OcrToken) {
        self.rect.union_in_place(&token.rect);
        self.parts.push(PhrasePart {
            value: token.value,
            rect: token.rect,
        });
    }

    /// Part values joined with single spaces.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|part| part.value.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A [`Phrase`] paired with the translation of its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedPhrase {
    pub locale: String,
    pub rect: Rect,
    pub parts: Vec<PhrasePart>,
    pub translated_value: String,
}

impl TranslatedPhrase {
    pub fn new(phrase: &Phrase, translated_value: impl Into<String>) -> Self {
        Self {
            locale: phrase.locale.clone(),
            rect: phrase.rect,
            parts: phrase.parts.clone(),
            translated_value: translated_value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_from_token_copies_rect() {
        let phrase = Phrase::from_token(OcrToken::new("Hello", "en", Rect::new(0.0, 0.0, 40.0, 10.0)));
        assert_eq!(phrase.rect, Rect::new(0.0, 0.0, 40.0, 10.0));
        assert_eq!(phrase.parts.len(), 1);
        assert_eq!(phrase.locale, "en");
    }

    #[test]
    fn test_phrase_push_grows_rect() {
        let mut phrase = Phrase::from_token(OcrToken::new("Hello", "en", Rect::new(0.0, 0.0, 40.0, 10.0)));
        phrase.push(OcrToken::new("World", "en", Rect::new(42.0, 1.0, 90.0, 11.0)));
        assert_eq!(phrase.rect, Rect::new(0.0, 0.0, 90.0, 11.0));
        assert_eq!(phrase.text(), "Hello World");
    }

    #[test]
    fn test_translated_phrase_serializes_camel_case() {
        let phrase = Phrase::from_token(OcrToken::new("Exit", "en", Rect::new(0.0, 0.0, 10.0, 5.0)));
        let translated = TranslatedPhrase::new(&phrase, "Выход");
        let json = serde_json::to_value(&translated).unwrap();
        assert_eq!(json["translatedValue"], "Выход");
        assert_eq!(json["parts"][0]["value"], "Exit");
    }
}
