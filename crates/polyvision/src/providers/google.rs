//! Google Cloud Vision and Translation (v3) REST providers.

use super::{OcrProvider, Plugin, TextAnnotation, TranslateTextRequest, Translation, TranslationProvider};
use crate::config::{TranslateOptions, VisionOptions};
use crate::{PolyvisionError, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const VISION_PROVIDER_NAME: &str = "google-vision";
pub const TRANSLATE_PROVIDER_NAME: &str = "google-translate";

fn build_http_client(provider: &str) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .build()
        .map_err(|e| PolyvisionError::provider_with_source(provider, "Failed to create HTTP client", e))
}

fn with_auth(request: reqwest::RequestBuilder, access_token: Option<&str>) -> reqwest::RequestBuilder {
    match access_token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

async fn check_status(provider: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(PolyvisionError::provider(
        provider,
        format!("request returned status {}: {}", status, body.trim()),
    ))
}

#[derive(Serialize)]
struct AnnotateImageBatch<'a> {
    requests: [AnnotateImageRequest<'a>; 1],
}

#[derive(Serialize)]
struct AnnotateImageRequest<'a> {
    image: ImageContent,
    features: [Feature<'a>; 1],
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Deserialize)]
struct AnnotateImageBatchResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    #[serde(default)]
    error: Option<ApiStatus>,
}

#[derive(Deserialize)]
struct ApiStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

/// `images:annotate` with `TEXT_DETECTION`.
pub struct GoogleVisionProvider {
    http: reqwest::Client,
    access_token: Option<String>,
}

impl GoogleVisionProvider {
    pub fn new(access_token: Option<String>) -> Result<Self> {
        Ok(Self {
            http: build_http_client(VISION_PROVIDER_NAME)?,
            access_token,
        })
    }
}

impl Plugin for GoogleVisionProvider {
    fn name(&self) -> &str {
        VISION_PROVIDER_NAME
    }
}

#[async_trait]
impl OcrProvider for GoogleVisionProvider {
    async fn detect_text(&self, image: &[u8], options: &VisionOptions) -> Result<Vec<TextAnnotation>> {
        let url = format!("{}/v1/images:annotate", options.endpoint.trim_end_matches('/'));
        let body = AnnotateImageBatch {
            requests: [AnnotateImageRequest {
                image: ImageContent {
                    content: base64::engine::general_purpose::STANDARD.encode(image),
                },
                features: [Feature { kind: "TEXT_DETECTION" }],
            }],
        };

        debug!(url = %url, image_bytes = image.len(), "sending text detection request");

        let response = with_auth(self.http.post(&url), self.access_token.as_deref())
            .json(&body)
            .send()
            .await
            .map_err(|e| PolyvisionError::provider_with_source(VISION_PROVIDER_NAME, "Text detection request failed", e))?;

        let parsed: AnnotateImageBatchResponse = check_status(VISION_PROVIDER_NAME, response)
            .await?
            .json()
            .await
            .map_err(|e| PolyvisionError::provider_with_source(VISION_PROVIDER_NAME, "Invalid text detection response", e))?;

        let Some(first) = parsed.responses.into_iter().next() else {
            return Ok(Vec::new());
        };

        if let Some(status) = first.error
            && status.code != 0
        {
            return Err(PolyvisionError::provider(
                VISION_PROVIDER_NAME,
                format!("text detection failed ({}): {}", status.code, status.message),
            ));
        }

        Ok(first.text_annotations)
    }
}

#[derive(Deserialize)]
struct TranslateTextResponse {
    #[serde(default)]
    translations: Vec<Translation>,
}

/// `projects/*/locations/*:translateText` (Cloud Translation v3).
pub struct GoogleTranslateProvider {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    access_token: Option<String>,
}

impl GoogleTranslateProvider {
    pub fn new(options: &TranslateOptions, access_token: Option<String>) -> Result<Self> {
        options.validate()?;

        Ok(Self {
            http: build_http_client(TRANSLATE_PROVIDER_NAME)?,
            endpoint: options.endpoint.trim_end_matches('/').to_string(),
            project_id: options.project_id.clone(),
            access_token,
        })
    }
}

impl Plugin for GoogleTranslateProvider {
    fn name(&self) -> &str {
        TRANSLATE_PROVIDER_NAME
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslateProvider {
    async fn translate_text(&self, request: &TranslateTextRequest) -> Result<Vec<Translation>> {
        let url = format!("{}/v3/{}:translateText", self.endpoint, request.parent);

        debug!(url = %url, contents = request.contents.len(), "sending translation request");

        let response = with_auth(self.http.post(&url), self.access_token.as_deref())
            .header("x-goog-user-project", &self.project_id)
            .json(request)
            .send()
            .await
            .map_err(|e| PolyvisionError::provider_with_source(TRANSLATE_PROVIDER_NAME, "Translation request failed", e))?;

        let parsed: TranslateTextResponse = check_status(TRANSLATE_PROVIDER_NAME, response)
            .await?
            .json()
            .await
            .map_err(|e| PolyvisionError::provider_with_source(TRANSLATE_PROVIDER_NAME, "Invalid translation response", e))?;

        Ok(parsed.translations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_request_body() {
        let body = AnnotateImageBatch {
            requests: [AnnotateImageRequest {
                image: ImageContent {
                    content: base64::engine::general_purpose::STANDARD.encode(b"png"),
                },
                features: [Feature { kind: "TEXT_DETECTION" }],
            }],
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["requests"][0]["image"]["content"], "cG5n");
        assert_eq!(json["requests"][0]["features"][0]["type"], "TEXT_DETECTION");
    }

    #[test]
    fn test_annotate_response_parsing() {
        let parsed: AnnotateImageBatchResponse = serde_json::from_str(
            r#"{"responses": [{"textAnnotations": [
                {"locale": "en", "description": "Hello World", "boundingPoly": {"vertices": [{"x": 0, "y": 0}]}},
                {"description": "Hello", "boundingPoly": {"vertices": [{"x": 0, "y": 0}, {"x": 40, "y": 10}]}}
            ]}]}"#,
        )
        .unwrap();

        let annotations = &parsed.responses[0].text_annotations;
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].locale.as_deref(), Some("en"));
        assert!(parsed.responses[0].error.is_none());
    }

    #[test]
    fn test_annotate_response_with_error() {
        let parsed: AnnotateImageBatchResponse =
            serde_json::from_str(r#"{"responses": [{"error": {"code": 3, "message": "Bad image data."}}]}"#).unwrap();
        let error = parsed.responses[0].error.as_ref().unwrap();
        assert_eq!(error.code, 3);
        assert_eq!(error.message, "Bad image data.");
    }

    #[test]
    fn test_translate_provider_requires_project() {
        let result = GoogleTranslateProvider::new(&TranslateOptions::default(), None);
        assert!(matches!(result, Err(PolyvisionError::Validation { .. })));
    }

    #[test]
    fn test_provider_names() {
        let vision = GoogleVisionProvider::new(None).unwrap();
        let translate = GoogleTranslateProvider::new(&TranslateOptions::new("p", "global"), None).unwrap();
        assert_eq!(vision.name(), "google-vision");
        assert_eq!(translate.name(), "google-translate");
    }
}
