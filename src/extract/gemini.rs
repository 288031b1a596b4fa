//! Gemini API Client
//!
//! `VisionBackend` implementation over the Gemini REST API
//! (`generateContent` + `ListModels`) with secure API key handling.
//! The key is read from `GEMINI_API_KEY` and held as a `SecretString`;
//! it never appears in logs or Debug output.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::backend::{InlineImage, ModelInfo, VisionBackend};
use crate::config::ExtractionConfig;
use crate::constants::network::{API_BASE, API_KEY_ENV};
use crate::extract::prompt;
use crate::types::{CuentasError, Result};

/// Gemini REST client with secure API key handling
pub struct GeminiClient {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: Url,
    temperature: f32,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base.as_str())
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl GeminiClient {
    /// Create a client from the environment and extraction settings.
    ///
    /// A missing `GEMINI_API_KEY` is a configuration error for the
    /// whole extraction feature, reported once and never retried.
    pub fn from_env(config: &ExtractionConfig) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            CuentasError::Config(format!(
                "{} is not set; extraction is disabled until it is provided",
                API_KEY_ENV
            ))
        })?;

        Self::new(api_key, config)
    }

    /// Create a client with an explicit key (tests, embedding callers)
    pub fn new(api_key: impl Into<String>, config: &ExtractionConfig) -> Result<Self> {
        let base = config.api_base.as_deref().unwrap_or(API_BASE);
        let api_base = Url::parse(base)
            .map_err(|e| CuentasError::Config(format!("Invalid API base URL {}: {}", base, e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CuentasError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key.into()),
            api_base,
            temperature: config.temperature,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let joined = format!("{}/{}", self.api_base.as_str().trim_end_matches('/'), path);
        Url::parse(&joined)
            .map_err(|e| CuentasError::Config(format!("Invalid endpoint {}: {}", joined, e)))
    }

    fn build_request(&self, prompt_text: &str, image: &InlineImage) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type.clone(),
                            data: image.data.clone(),
                        },
                    },
                    Part::Text {
                        text: prompt_text.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                response_mime_type: "application/json".to_string(),
                response_schema: Some(prompt::response_schema()),
            },
        }
    }
}

#[async_trait]
impl VisionBackend for GeminiClient {
    async fn generate(&self, model: &str, prompt_text: &str, image: &InlineImage) -> Result<String> {
        let url = self.endpoint(&format!("models/{}:generateContent", model))?;
        let request = self.build_request(prompt_text, image);

        debug!(model, "Sending generateContent request");

        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&request)
            .send()
            .await
            .map_err(|e| CuentasError::backend_message(model, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(model, status, "generateContent returned an error status");
            return Err(CuentasError::backend_status(model, status, body));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            CuentasError::backend_message(model, format!("unreadable response body: {}", e))
        })?;

        body.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| CuentasError::malformed("empty response from model", ""))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = self.endpoint("models")?;

        let response = self
            .client
            .get(url)
            .query(&[("key", self.api_key.expose_secret())])
            .send()
            .await
            .map_err(|e| {
                CuentasError::backend_message("models", format!("request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CuentasError::backend_status("models", status, body));
        }

        let body: ListModelsResponse = response.json().await.map_err(|e| {
            CuentasError::backend_message("models", format!("unreadable response body: {}", e))
        })?;

        Ok(body
            .models
            .into_iter()
            .map(|m| ModelInfo {
                name: m
                    .name
                    .strip_prefix("models/")
                    .unwrap_or(&m.name)
                    .to_string(),
                methods: m.supported_generation_methods,
            })
            .collect())
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}
