//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! The API key itself is never part of the config file; it is read
//! from the `GEMINI_API_KEY` environment variable at client creation.

use serde::{Deserialize, Serialize};

use crate::constants::{extraction, imaging, models, network};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Receipt extraction settings
    pub extraction: ExtractionConfig,

    /// Image pre-processing settings
    pub image: ImageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig::default(),
            image: ImageConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `CuentasError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if self.extraction.models.is_empty() {
            return Err(crate::types::CuentasError::Config(
                "extraction.models must list at least one candidate model".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.extraction.temperature) {
            return Err(crate::types::CuentasError::Config(format!(
                "extraction.temperature must be between 0.0 and 2.0, got {}",
                self.extraction.temperature
            )));
        }

        if self.extraction.timeout_secs == 0 {
            return Err(crate::types::CuentasError::Config(
                "extraction.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.image.max_edge == 0 {
            return Err(crate::types::CuentasError::Config(
                "image.max_edge must be greater than 0".to_string(),
            ));
        }

        if !(1..=100).contains(&self.image.jpeg_quality) {
            return Err(crate::types::CuentasError::Config(format!(
                "image.jpeg_quality must be between 1 and 100, got {}",
                self.image.jpeg_quality
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Extraction Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Ordered candidate models, tried top to bottom on unavailability
    pub models: Vec<String>,

    /// Query the ListModels endpoint and rebuild the candidate list
    /// from what the backend actually serves
    pub discover_models: bool,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Temperature for generation (0.0 = deterministic)
    pub temperature: f32,

    /// API base URL override (for proxies/test servers)
    pub api_base: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            models: models::DEFAULT_CANDIDATES
                .iter()
                .map(|m| m.to_string())
                .collect(),
            discover_models: false,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: extraction::DEFAULT_TEMPERATURE,
            api_base: None,
        }
    }
}

// =============================================================================
// Image Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Downscale and re-encode before upload
    pub normalize: bool,

    /// Longest edge after downscaling (pixels)
    pub max_edge: u32,

    /// JPEG re-encode quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            normalize: true,
            max_edge: imaging::MAX_EDGE_PX,
            jpeg_quality: imaging::JPEG_QUALITY,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extraction.models[0], "gemini-2.0-flash");
        assert!(config.image.normalize);
    }

    #[test]
    fn test_validate_rejects_empty_models() {
        let mut config = Config::default();
        config.extraction.models.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let mut config = Config::default();
        config.extraction.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_quality() {
        let mut config = Config::default();
        config.image.jpeg_quality = 0;
        assert!(config.validate().is_err());
        config.image.jpeg_quality = 101;
        assert!(config.validate().is_err());
    }
}
