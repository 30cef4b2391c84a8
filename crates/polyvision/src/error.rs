//! Error types for PolyVision.
//!
//! Every fallible operation in the crate returns [`PolyvisionError`]. The
//! rules for how errors travel are strict:
//!
//! - `Io` (from `std::io::Error`) bubbles up unchanged. These are real system
//!   problems and must never be wrapped or suppressed.
//! - `Serialization` is raised when a stored cache blob cannot be decoded. A
//!   missing cache file is *not* an error, it is a miss.
//! - `Cache` is raised when the durable cache tier cannot be written. The
//!   ephemeral tier has already been updated at that point.
//! - `Provider` wraps OCR and translation provider failures. Nothing in this
//!   crate retries them.
//!
//! # Example
//!
//! ```rust
//! use polyvision::{PolyvisionError, Result};
//!
//! fn require_project(project_id: &str) -> Result<()> {
//!     if project_id.is_empty() {
//!         return Err(PolyvisionError::validation("translate.project_id is empty"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_project("").is_err());
//! ```
use thiserror::Error;

/// Result type alias using `PolyvisionError`.
pub type Result<T> = std::result::Result<T, PolyvisionError>;

/// Main error type for all PolyVision operations.
#[derive(Debug, Error)]
pub enum PolyvisionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Cache error: {message}")]
    Cache {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Provider error in '{provider}': {message}")]
    Provider {
        provider: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for PolyvisionError {
    fn from(err: serde_json::Error) -> Self {
        PolyvisionError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl PolyvisionError {
    error_constructor!(validation, Validation);
    error_constructor!(cache, Cache);
    error_constructor!(serialization, Serialization);

    /// Create a provider error attributed to `provider`.
    pub fn provider<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a provider error attributed to `provider`, keeping the underlying cause.
    pub fn provider_with_source<P, S, E>(provider: P, message: S, source: E) -> Self
    where
        P: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PolyvisionError = io_err.into();
        assert!(matches!(err, PolyvisionError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_validation_error() {
        let err = PolyvisionError::validation("invalid input");
        assert_eq!(err.to_string(), "Validation error: invalid input");
    }

    #[test]
    fn test_cache_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "cannot write");
        let err = PolyvisionError::cache_with_source("cache write failed", source);
        assert_eq!(err.to_string(), "Cache error: cache write failed");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_serialization_error() {
        let err = PolyvisionError::serialization("bad blob");
        assert_eq!(err.to_string(), "Serialization error: bad blob");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_provider_error_names_provider() {
        let err = PolyvisionError::provider("google-vision", "quota exceeded");
        assert_eq!(err.to_string(), "Provider error in 'google-vision': quota exceeded");
    }

    #[test]
    fn test_provider_error_with_source() {
        let source = std::io::Error::other("connection reset");
        let err = PolyvisionError::provider_with_source("google-translate", "request failed", source);
        assert!(matches!(err, PolyvisionError::Provider { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: PolyvisionError = json_err.into();
        assert!(matches!(err, PolyvisionError::Serialization { .. }));
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_other_error() {
        let err = PolyvisionError::Other("unexpected".to_string());
        assert_eq!(err.to_string(), "unexpected");
    }
}
