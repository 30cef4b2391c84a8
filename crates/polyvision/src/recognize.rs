//! Recognition: image bytes to phrases.

use crate::cache::{RECOGNITION_NAMESPACE, namespaced_key};
use crate::client::PolyVision;
use crate::config::DEFAULT_LOCALE;
use crate::geometry::Rect;
use crate::phrases::reconstruct;
use crate::providers::TextAnnotation;
use crate::types::{OcrToken, Phrase};
use crate::Result;
use tracing::debug;

/// Turn provider annotations into word tokens.
///
/// The first annotation is the whole-image summary and is dropped. A missing
/// locale becomes `"en"`.
pub fn tokens_from_annotations(annotations: Vec<TextAnnotation>) -> Vec<OcrToken> {
    annotations
        .into_iter()
        .skip(1)
        .map(|annotation| OcrToken {
            rect: Rect::from_vertices(&annotation.bounding_poly.vertices),
            locale: annotation.locale.unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            value: annotation.description,
        })
        .collect()
}

impl PolyVision {
    /// Recognize text in `image` and group it into phrases.
    ///
    /// With a `key`, a cached result under `vision:<key>` is returned without
    /// calling the provider, and a fresh result is stored there. Without a key
    /// the cache is not touched.
    #[tracing::instrument(skip(self, image), fields(image_bytes = image.len()))]
    pub async fn recognize(&self, key: Option<&str>, image: &[u8]) -> Result<Vec<Phrase>> {
        let cache_key = key.map(|key| namespaced_key(RECOGNITION_NAMESPACE, key));

        if let Some(cache_key) = &cache_key
            && let Some(cached) = self.cache().get_typed::<Vec<Phrase>>(cache_key).await?
        {
            debug!(cache_key = %cache_key, phrases = cached.len(), "recognition cache hit");
            return Ok(cached);
        }

        debug!(provider = self.ocr.name(), "calling OCR provider");
        let annotations = self.ocr.detect_text(image, self.vision_options()).await?;
        let phrases = reconstruct(tokens_from_annotations(annotations));
        debug!(phrases = phrases.len(), "reconstructed phrases");

        match cache_key {
            Some(cache_key) => self.cache().set_typed(&cache_key, phrases).await,
            None => Ok(phrases),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vertex;

    fn quad(x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<Vertex> {
        vec![
            Vertex::new(x1, y1),
            Vertex::new(x2, y1),
            Vertex::new(x2, y2),
            Vertex::new(x1, y2),
        ]
    }

    #[test]
    fn test_summary_annotation_is_dropped() {
        let tokens = tokens_from_annotations(vec![
            TextAnnotation::new("Hello World", Some("en"), quad(0.0, 0.0, 90.0, 11.0)),
            TextAnnotation::new("Hello", None, quad(0.0, 0.0, 40.0, 10.0)),
            TextAnnotation::new("World", None, quad(42.0, 1.0, 90.0, 11.0)),
        ]);

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].value, "Hello");
        assert_eq!(tokens[1].rect, Rect::new(42.0, 1.0, 90.0, 11.0));
    }

    #[test]
    fn test_missing_locale_defaults_to_english() {
        let tokens = tokens_from_annotations(vec![
            TextAnnotation::new("summary", Some("fr"), quad(0.0, 0.0, 1.0, 1.0)),
            TextAnnotation::new("mot", None, quad(0.0, 0.0, 1.0, 1.0)),
            TextAnnotation::new("mot", Some("fr"), quad(0.0, 0.0, 1.0, 1.0)),
        ]);

        assert_eq!(tokens[0].locale, "en");
        assert_eq!(tokens[1].locale, "fr");
    }

    #[test]
    fn test_empty_annotations() {
        assert!(tokens_from_annotations(Vec::new()).is_empty());
    }
}
