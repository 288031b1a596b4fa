//! Receipt Extraction Pipeline
//!
//! Turns receipt image bytes into a validated list of priced line
//! items:
//!
//! 1. optional image normalization (downscale + JPEG re-encode)
//! 2. candidate-model fallback loop against the vision backend
//! 3. output sanitization into clean `RawItem` records
//!
//! ## Fallback strategy
//!
//! Candidates are tried strictly one at a time, in roster order. Only
//! an `Unavailable`-class failure (model not found/serving) advances
//! to the next candidate; a malformed response or any other failure
//! is a content/request problem, not an availability problem, and is
//! surfaced immediately without consulting further models. Exhausting
//! the roster yields `AllModelsUnavailable`.

mod backend;
mod gemini;
mod image;
mod prompt;
mod roster;
mod sanitize;

pub use backend::{InlineImage, ModelInfo, VisionBackend};
pub use gemini::GeminiClient;
pub use self::image::{mime_for_path, normalize_image};
pub use prompt::EXTRACTION_PROMPT;
pub use roster::{ModelRoster, model_priority};
pub use sanitize::{parse_items, strip_code_fences};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{Config, ImageConfig};
use crate::types::{CuentasError, RawItem, Result};

/// Receipt extraction front door (the `uploadImage` boundary).
///
/// Holds no state between scans; a single in-flight scan at a time is
/// the caller's responsibility.
pub struct ReceiptExtractor {
    backend: Arc<dyn VisionBackend>,
    roster: ModelRoster,
    image: ImageConfig,
}

impl ReceiptExtractor {
    /// Build the production extractor: Gemini client keyed from the
    /// environment plus the configured roster
    pub fn from_env(config: &Config) -> Result<Self> {
        let client = GeminiClient::from_env(&config.extraction)?;
        Ok(Self::with_backend(Arc::new(client), config))
    }

    /// Build an extractor over any backend (tests, alternate providers)
    pub fn with_backend(backend: Arc<dyn VisionBackend>, config: &Config) -> Self {
        Self {
            backend,
            roster: ModelRoster::from_config(&config.extraction),
            image: config.image.clone(),
        }
    }

    /// Extract line items from a receipt image.
    ///
    /// An empty vector is a valid outcome (nothing legible on the
    /// receipt); callers decide how to surface it.
    pub async fn scan(&self, bytes: &[u8], mime: &str) -> Result<Vec<RawItem>> {
        let (payload, mime) = if self.image.normalize {
            normalize_image(bytes, self.image.max_edge, self.image.jpeg_quality)?
        } else {
            (bytes.to_vec(), mime.to_string())
        };

        let image = InlineImage::new(mime, STANDARD.encode(&payload));

        let candidates = self.roster.candidates(self.backend.as_ref()).await;
        if candidates.is_empty() {
            return Err(CuentasError::Config(
                "no candidate models configured".to_string(),
            ));
        }

        let mut attempted = 0;
        for model in &candidates {
            attempted += 1;
            debug!(model = %model, attempt = attempted, "Attempting extraction");

            match self
                .backend
                .generate(model, EXTRACTION_PROMPT, &image)
                .await
            {
                Ok(text) => {
                    let items = parse_items(&text)?;
                    info!(model = %model, items = items.len(), "Extraction succeeded");
                    return Ok(items);
                }
                Err(e) if e.is_unavailable() => {
                    warn!(model = %model, error = %e, "Model unavailable, trying next candidate");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(CuentasError::AllModelsUnavailable { attempted })
    }
}
