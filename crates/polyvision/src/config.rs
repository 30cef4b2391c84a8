//! Client configuration and loading.
//!
//! A [`PolyvisionConfig`] can be built in code, loaded from TOML, YAML or JSON,
//! or discovered as `polyvision.toml` in the current directory or one of its
//! parents.

use crate::{PolyvisionError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Source language of every translation request.
pub const SOURCE_LANGUAGE: &str = "en";

/// Target language of every translation request.
pub const TARGET_LANGUAGE: &str = "ru";

/// MIME type of translation request contents.
pub const TEXT_MIME_TYPE: &str = "text/plain";

/// Locale assumed for detections that carry none.
pub const DEFAULT_LOCALE: &str = "en";

/// Environment variable consulted for a bearer token when the config has none.
pub const ACCESS_TOKEN_ENV: &str = "POLYVISION_ACCESS_TOKEN";

/// Name of the file looked up by [`PolyvisionConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "polyvision.toml";

/// Main client configuration.
///
/// # Example
///
/// ```rust
/// use polyvision::PolyvisionConfig;
///
/// let config: PolyvisionConfig = toml::from_str(r#"
///     [translate]
///     project_id = "vision-261908"
/// "#).unwrap();
///
/// assert_eq!(config.translate.location, "global");
/// assert!(config.cache.directory.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolyvisionConfig {
    /// OCR provider options
    #[serde(default)]
    pub vision: VisionOptions,

    /// Translation provider target
    #[serde(default)]
    pub translate: TranslateOptions,

    /// Cache backend selection
    #[serde(default)]
    pub cache: CacheConfig,

    /// Bearer token for both providers (None = read `POLYVISION_ACCESS_TOKEN`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// OCR provider options.
///
/// The provider takes no tuning options yet. `endpoint` only selects where
/// requests are sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionOptions {
    #[serde(default = "default_vision_endpoint")]
    pub endpoint: String,
}

/// Translation provider target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateOptions {
    /// Cloud project identifier
    #[serde(default)]
    pub project_id: String,

    /// Region, e.g. "global" or "us-central1"
    #[serde(default = "default_location")]
    pub location: String,

    #[serde(default = "default_translate_endpoint")]
    pub endpoint: String,
}

/// Cache backend selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory of the persistent tier (None = memory only)
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

fn default_vision_endpoint() -> String {
    "https://vision.googleapis.com".to_string()
}

fn default_translate_endpoint() -> String {
    "https://translation.googleapis.com".to_string()
}

fn default_location() -> String {
    "global".to_string()
}

impl Default for VisionOptions {
    fn default() -> Self {
        Self {
            endpoint: default_vision_endpoint(),
        }
    }
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            location: default_location(),
            endpoint: default_translate_endpoint(),
        }
    }
}

impl TranslateOptions {
    pub fn new(project_id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            location: location.into(),
            ..Default::default()
        }
    }

    /// Parent resource path of translation requests.
    pub fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project_id, self.location)
    }

    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(PolyvisionError::validation("translate.project_id must not be empty"));
        }
        if self.location.trim().is_empty() {
            return Err(PolyvisionError::validation("translate.location must not be empty"));
        }
        Ok(())
    }
}

impl CacheConfig {
    /// Platform cache directory for PolyVision, e.g. `~/.cache/polyvision`.
    pub fn default_directory() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("polyvision"))
    }
}

impl PolyvisionConfig {
    pub fn validate(&self) -> Result<()> {
        self.translate.validate()
    }

    /// Token from the config, else from `POLYVISION_ACCESS_TOKEN`.
    pub fn resolve_access_token(&self) -> Option<String> {
        let non_empty = |token: &String| !token.trim().is_empty();

        self.access_token
            .clone()
            .filter(non_empty)
            .or_else(|| std::env::var(ACCESS_TOKEN_ENV).ok().filter(non_empty))
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        toml::from_str(&content)
            .map_err(|e| PolyvisionError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        serde_yaml_ng::from_str(&content)
            .map_err(|e| PolyvisionError::validation(format!("Invalid YAML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        serde_json::from_str(&content)
            .map_err(|e| PolyvisionError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration, picking the format from the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(PolyvisionError::validation(format!(
                "Unsupported config file format: {}. Use .toml, .yaml, .yml or .json",
                path.display()
            ))),
        }
    }

    /// Discover `polyvision.toml` in the current directory or its parents.
    pub fn discover() -> Result<Option<Self>> {
        let current = std::env::current_dir().map_err(PolyvisionError::Io)?;
        Self::discover_from(&current)
    }

    /// Discover `polyvision.toml` starting at `start` and walking up.
    pub fn discover_from(start: &Path) -> Result<Option<Self>> {
        for dir in start.ancestors() {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                tracing::debug!("Using config file {}", candidate.display());
                return Ok(Some(Self::from_toml_file(candidate)?));
            }
        }

        Ok(None)
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| PolyvisionError::validation(format!("Failed to read config file {}: {}", path.display(), e)))
}
