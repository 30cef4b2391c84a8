//! Provider seams for OCR and translation.
//!
//! The operations in [`crate::client`] only talk to providers through
//! [`OcrProvider`] and [`TranslationProvider`]. The Google REST
//! implementations live in [`google`] behind the `http-providers` feature;
//! tests and embedders can plug in anything else.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use polyvision::providers::{Plugin, TranslateTextRequest, Translation, TranslationProvider};
//! use polyvision::Result;
//!
//! struct Shouting;
//!
//! impl Plugin for Shouting {
//!     fn name(&self) -> &str { "shouting" }
//! }
//!
//! #[async_trait]
//! impl TranslationProvider for Shouting {
//!     async fn translate_text(&self, request: &TranslateTextRequest) -> Result<Vec<Translation>> {
//!         Ok(request
//!             .contents
//!             .iter()
//!             .map(|text| Translation::new(text.to_uppercase()))
//!             .collect())
//!     }
//! }
//! ```

#[cfg(feature = "http-providers")]
pub mod google;

use crate::Result;
use crate::config::{SOURCE_LANGUAGE, TARGET_LANGUAGE, TEXT_MIME_TYPE, TranslateOptions, VisionOptions};
use crate::geometry::Vertex;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identification shared by every provider.
pub trait Plugin: Send + Sync {
    /// Unique lowercase name, used in error messages and logs.
    fn name(&self) -> &str;

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

/// Bounding polygon of a detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingPoly {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
}

/// One raw text detection as returned by the OCR provider.
///
/// The first annotation of a response covers the whole image; the rest are
/// single words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnnotation {
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default)]
    pub bounding_poly: BoundingPoly,
}

impl TextAnnotation {
    pub fn new(description: impl Into<String>, locale: Option<&str>, vertices: Vec<Vertex>) -> Self {
        Self {
            description: description.into(),
            locale: locale.map(str::to_string),
            bounding_poly: BoundingPoly { vertices },
        }
    }
}

/// Text detection backend.
#[async_trait]
pub trait OcrProvider: Plugin {
    /// Run text detection over encoded image bytes.
    ///
    /// Returns annotations in detection order, summary annotation first. The
    /// bytes are passed through unvalidated.
    async fn detect_text(&self, image: &[u8], options: &VisionOptions) -> Result<Vec<TextAnnotation>>;
}

/// Batch translation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateTextRequest {
    /// `projects/<id>/locations/<location>`; sent in the URL, not the body
    #[serde(skip)]
    pub parent: String,
    pub contents: Vec<String>,
    pub mime_type: String,
    pub source_language_code: String,
    pub target_language_code: String,
}

impl TranslateTextRequest {
    /// Build a request with the fixed language pair and MIME type.
    pub fn new(options: &TranslateOptions, contents: Vec<String>) -> Self {
        Self {
            parent: options.parent(),
            contents,
            mime_type: TEXT_MIME_TYPE.to_string(),
            source_language_code: SOURCE_LANGUAGE.to_string(),
            target_language_code: TARGET_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub translated_text: String,
}

impl Translation {
    pub fn new(translated_text: impl Into<String>) -> Self {
        Self {
            translated_text: translated_text.into(),
        }
    }
}

/// Text translation backend.
#[async_trait]
pub trait TranslationProvider: Plugin {
    /// Translate every entry of `request.contents`, preserving order.
    async fn translate_text(&self, request: &TranslateTextRequest) -> Result<Vec<Translation>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_request_shape() {
        let options = TranslateOptions::new("vision-261908", "global");
        let request = TranslateTextRequest::new(&options, vec!["Hello".to_string()]);

        assert_eq!(request.parent, "projects/vision-261908/locations/global");
        assert_eq!(request.mime_type, "text/plain");
        assert_eq!(request.source_language_code, "en");
        assert_eq!(request.target_language_code, "ru");

        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("parent").is_none());
        assert_eq!(body["mimeType"], "text/plain");
        assert_eq!(body["sourceLanguageCode"], "en");
        assert_eq!(body["targetLanguageCode"], "ru");
        assert_eq!(body["contents"][0], "Hello");
    }

    #[test]
    fn test_text_annotation_wire_format() {
        let annotation: TextAnnotation = serde_json::from_str(
            r#"{
                "description": "Menu",
                "boundingPoly": {"vertices": [{"x": 1, "y": 2}, {"x": 30}, {"x": 30, "y": 12}, {"y": 12}]}
            }"#,
        )
        .unwrap();

        assert_eq!(annotation.description, "Menu");
        assert!(annotation.locale.is_none());
        assert_eq!(annotation.bounding_poly.vertices.len(), 4);
        assert_eq!(annotation.bounding_poly.vertices[1], Vertex::new(30.0, 0.0));
    }

    #[test]
    fn test_translation_wire_format() {
        let translation: Translation = serde_json::from_str(r#"{"translatedText": "Привет"}"#).unwrap();
        assert_eq!(translation.translated_text, "Привет");
    }
}
