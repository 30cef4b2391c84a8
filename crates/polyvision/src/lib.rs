//! PolyVision - OCR and translation with phrase reconstruction
//!
//! PolyVision sends an image to an OCR provider, regroups the word-level
//! detections into phrases using nothing but their bounding boxes, and
//! translates each phrase while keeping its geometry. Results of both steps
//! can be cached under a caller-supplied key.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use polyvision::{PolyVision, PolyvisionConfig, TranslateOptions};
//!
//! # async fn example() -> polyvision::Result<()> {
//! let config = PolyvisionConfig {
//!     translate: TranslateOptions::new("vision-261908", "global"),
//!     ..Default::default()
//! };
//! let client = PolyVision::new(config)?;
//!
//! let image = std::fs::read("menu.jpg")?;
//! let phrases = client.recognize(Some("menu"), &image).await?;
//! let translated = client.translate(Some("menu"), &phrases).await?;
//!
//! for phrase in translated {
//!     println!("{:?} -> {}", phrase.rect, phrase.translated_value);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Geometry** (`geometry`): rectangle union and intersection
//! - **Phrases** (`phrases`): single-pass greedy grouping of word tokens
//! - **Cache** (`cache`): memory and memory-over-disk blob stores
//! - **Providers** (`providers`): OCR and translation traits plus Google REST clients
//! - **Client** (`client`, `recognize`, `translate`): the two cached operations

#![deny(unsafe_code)]

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod geometry;
pub mod phrases;
pub mod providers;
pub mod recognize;
pub mod translate;
pub mod types;

pub use cache::{BlobCache, LayeredCache, MemoryCache};
pub use client::{PolyVision, PolyVisionBuilder};
pub use config::{CacheConfig, PolyvisionConfig, TranslateOptions, VisionOptions};
pub use error::{PolyvisionError, Result};
pub use geometry::{Rect, Vertex};
pub use phrases::reconstruct;
pub use types::{OcrToken, Phrase, PhrasePart, TranslatedPhrase};
