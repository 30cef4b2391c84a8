//! The client handle shared by recognition and translation.
//!
//! A [`PolyVision`] owns the cache and both providers. Build it once and pass
//! it around (it is cheap to clone); nothing in the crate keeps a hidden
//! process-wide provider.

use crate::cache::{BlobCache, LayeredCache, MemoryCache};
use crate::config::{CacheConfig, PolyvisionConfig, TranslateOptions, VisionOptions};
use crate::providers::{OcrProvider, TranslationProvider};
use crate::{PolyvisionError, Result};
use std::sync::Arc;

/// Client handle carrying configuration, cache and providers.
#[derive(Clone)]
pub struct PolyVision {
    config: Arc<PolyvisionConfig>,
    cache: Arc<dyn BlobCache>,
    pub(crate) ocr: Arc<dyn OcrProvider>,
    pub(crate) translator: Arc<dyn TranslationProvider>,
}

impl std::fmt::Debug for PolyVision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolyVision")
            .field("config", &self.config)
            .field("ocr", &self.ocr.name())
            .field("translator", &self.translator.name())
            .finish_non_exhaustive()
    }
}

impl PolyVision {
    /// Build a client with the Google REST providers and the cache selected
    /// by `config.cache`.
    #[cfg(feature = "http-providers")]
    pub fn new(config: PolyvisionConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: PolyvisionConfig) -> PolyVisionBuilder {
        PolyVisionBuilder {
            config,
            cache: None,
            ocr: None,
            translator: None,
        }
    }

    pub fn config(&self) -> &PolyvisionConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<dyn BlobCache> {
        &self.cache
    }

    pub fn vision_options(&self) -> &VisionOptions {
        &self.config.vision
    }

    pub fn translate_options(&self) -> &TranslateOptions {
        &self.config.translate
    }
}

/// Builder for [`PolyVision`] with optional injected collaborators.
pub struct PolyVisionBuilder {
    config: PolyvisionConfig,
    cache: Option<Arc<dyn BlobCache>>,
    ocr: Option<Arc<dyn OcrProvider>>,
    translator: Option<Arc<dyn TranslationProvider>>,
}

impl PolyVisionBuilder {
    /// Use `cache` instead of the one described by `config.cache`.
    pub fn cache(mut self, cache: Arc<dyn BlobCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn ocr_provider(mut self, provider: Arc<dyn OcrProvider>) -> Self {
        self.ocr = Some(provider);
        self
    }

    pub fn translation_provider(mut self, provider: Arc<dyn TranslationProvider>) -> Self {
        self.translator = Some(provider);
        self
    }

    pub fn build(self) -> Result<PolyVision> {
        let cache = match self.cache {
            Some(cache) => cache,
            None => cache_from_config(&self.config.cache)?,
        };

        #[cfg(feature = "http-providers")]
        let (ocr, translator) = {
            let token = self.config.resolve_access_token();
            let ocr: Arc<dyn OcrProvider> = match self.ocr {
                Some(ocr) => ocr,
                None => Arc::new(crate::providers::google::GoogleVisionProvider::new(token.clone())?),
            };
            let translator: Arc<dyn TranslationProvider> = match self.translator {
                Some(translator) => translator,
                None => Arc::new(crate::providers::google::GoogleTranslateProvider::new(
                    &self.config.translate,
                    token,
                )?),
            };
            (ocr, translator)
        };

        #[cfg(not(feature = "http-providers"))]
        let (ocr, translator) = {
            let ocr = self.ocr.ok_or_else(|| {
                PolyvisionError::validation("No OCR provider configured (enable the `http-providers` feature)")
            })?;
            let translator = self.translator.ok_or_else(|| {
                PolyvisionError::validation("No translation provider configured (enable the `http-providers` feature)")
            })?;
            (ocr, translator)
        };

        tracing::debug!(ocr = ocr.name(), translator = translator.name(), "client ready");

        Ok(PolyVision {
            config: Arc::new(self.config),
            cache,
            ocr,
            translator,
        })
    }
}

fn cache_from_config(config: &CacheConfig) -> Result<Arc<dyn BlobCache>> {
    match &config.directory {
        Some(dir) => {
            if dir.as_os_str().is_empty() {
                return Err(PolyvisionError::validation("cache.directory must not be empty"));
            }
            Ok(Arc::new(LayeredCache::new(dir)?))
        }
        None => Ok(Arc::new(MemoryCache::new())),
    }
}
