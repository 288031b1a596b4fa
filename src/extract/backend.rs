//! Vision Backend Abstraction
//!
//! Defines the `VisionBackend` trait separating the extraction
//! pipeline from the concrete Gemini HTTP client, so the fallback
//! loop can be exercised against mocks.

use async_trait::async_trait;

use crate::types::Result;

/// An image payload ready for inline transmission
#[derive(Debug, Clone)]
pub struct InlineImage {
    /// MIME type, e.g. "image/jpeg"
    pub mime_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// One model advertised by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// Bare model name, without the "models/" resource prefix
    pub name: String,
    /// Generation methods the model supports
    pub methods: Vec<String>,
}

impl ModelInfo {
    /// Whether the model can serve `generateContent` requests
    pub fn supports_generation(&self) -> bool {
        self.methods
            .iter()
            .any(|m| m == crate::constants::models::GENERATE_METHOD)
    }
}

/// Generative vision backend
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Send the image plus instructions to one named model and return
    /// the raw text of its first candidate response
    async fn generate(&self, model: &str, prompt: &str, image: &InlineImage) -> Result<String>;

    /// List the models the backend currently serves
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;

    /// Backend name for logging
    fn name(&self) -> &str;
}
