//! Unified Error Type System
//!
//! Centralized error types for the entire application, with a slim
//! category layer driving the model-fallback loop.
//!
//! ## Error Categories
//!
//! - **Unavailable**: the selected model is not found/serving (try next candidate)
//! - **Auth**: authentication failures (fail fast)
//! - **RateLimit**: API rate limiting (surface to the caller)
//! - **BadRequest**: invalid request (fix request, don't retry)
//! - **Transient**: temporary server issues
//! - **Network**: connectivity issues
//!
//! Only `Unavailable` advances the candidate roster; every other
//! category stops the extraction and surfaces immediately.

use thiserror::Error;

use crate::constants::extraction::RAW_PREVIEW_CHARS;

// =============================================================================
// Error Categories
// =============================================================================

/// Backend error categories for routing decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Model not found or not serving - try the next candidate
    Unavailable,
    /// Authentication failed - fail fast, don't retry
    Auth,
    /// Rate limited
    RateLimit,
    /// Invalid request
    BadRequest,
    /// Temporary server issues
    Transient,
    /// Network/connectivity issues
    Network,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::Auth => write!(f, "AUTH"),
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Check if this category should advance to the next candidate model
    pub fn should_fallback(&self) -> bool {
        matches!(self, Self::Unavailable)
    }

    /// Classify an HTTP status code (more accurate than string matching)
    pub fn from_status(status: u16) -> Self {
        match status {
            404 | 503 => Self::Unavailable,
            401 | 403 => Self::Auth,
            429 => Self::RateLimit,
            400 => Self::BadRequest,
            500 | 502 | 504 => Self::Transient,
            _ => Self::Unknown,
        }
    }

    /// Classify an error message when no status code is available
    pub fn from_message(message: &str) -> Self {
        let lower = message.to_lowercase();

        if lower.contains("not found")
            || lower.contains("not supported")
            || lower.contains("unavailable")
            || lower.contains("deprecated")
        {
            return Self::Unavailable;
        }

        if lower.contains("api key") || lower.contains("unauthorized") || lower.contains("auth") {
            return Self::Auth;
        }

        if lower.contains("rate limit")
            || lower.contains("quota")
            || lower.contains("too many requests")
        {
            return Self::RateLimit;
        }

        if lower.contains("connection")
            || lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("dns")
        {
            return Self::Network;
        }

        Self::Unknown
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum CuentasError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Configuration & Input
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Could not decode image: {0}")]
    ImageDecode(String),

    // -------------------------------------------------------------------------
    // Extraction Errors
    // -------------------------------------------------------------------------
    /// A single backend/model attempt failed
    #[error("Backend error ({model}, {category}): {message}")]
    Backend {
        model: String,
        category: ErrorCategory,
        message: String,
    },

    /// Every candidate model was tried and none could serve the request
    #[error("No candidate model could process the receipt ({attempted} tried)")]
    AllModelsUnavailable { attempted: usize },

    /// Model output was not parseable JSON; `raw` keeps the original
    /// text for diagnostics
    #[error("Malformed model output: {message}")]
    MalformedOutput { message: String, raw: String },

    /// Parsed JSON was valid but not an array of items
    #[error("Expected a JSON array of items, got {found}")]
    InvalidFormat { found: String },
}

impl CuentasError {
    /// Create a backend error from an HTTP status code
    pub fn backend_status(
        model: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        Self::Backend {
            model: model.into(),
            category: ErrorCategory::from_status(status),
            message: message.into(),
        }
    }

    /// Create a backend error classified from its message
    pub fn backend_message(model: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Backend {
            model: model.into(),
            category: ErrorCategory::from_message(&message),
            message,
        }
    }

    /// Create a malformed-output error with a bounded raw preview in
    /// the message and the full text retained for diagnostics
    pub fn malformed(message: impl Into<String>, raw: &str) -> Self {
        let preview: String = raw.chars().take(RAW_PREVIEW_CHARS).collect();
        Self::MalformedOutput {
            message: format!("{} (output starts: {:?})", message.into(), preview),
            raw: raw.to_string(),
        }
    }

    /// Check if this error should advance the candidate roster
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Backend { category, .. } if category.should_fallback()
        )
    }

    /// Human-readable message safe to display directly to end users
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Config(_) => "Falta configurar la clave de API (GEMINI_API_KEY).",
            Self::Io(_) | Self::Input(_) => "No se pudo leer la imagen seleccionada.",
            Self::ImageDecode(_) => "La imagen no se pudo procesar. Intenta con otra foto.",
            Self::AllModelsUnavailable { .. } => {
                "El servicio de análisis no está disponible en este momento."
            }
            Self::Backend { .. }
            | Self::MalformedOutput { .. }
            | Self::InvalidFormat { .. }
            | Self::Json(_) => "Error procesando la factura. Intenta con una imagen más clara.",
        }
    }
}

pub type Result<T> = std::result::Result<T, CuentasError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_status() {
        assert_eq!(ErrorCategory::from_status(404), ErrorCategory::Unavailable);
        assert_eq!(ErrorCategory::from_status(503), ErrorCategory::Unavailable);
        assert_eq!(ErrorCategory::from_status(401), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_status(429), ErrorCategory::RateLimit);
        assert_eq!(ErrorCategory::from_status(400), ErrorCategory::BadRequest);
        assert_eq!(ErrorCategory::from_status(500), ErrorCategory::Transient);
        assert_eq!(ErrorCategory::from_status(418), ErrorCategory::Unknown);
    }

    #[test]
    fn test_category_from_message() {
        assert_eq!(
            ErrorCategory::from_message("models/gemini-x is not found for API version v1beta"),
            ErrorCategory::Unavailable
        );
        assert_eq!(
            ErrorCategory::from_message("API key not valid"),
            ErrorCategory::Auth
        );
        assert_eq!(
            ErrorCategory::from_message("Resource quota exceeded"),
            ErrorCategory::RateLimit
        );
        assert_eq!(
            ErrorCategory::from_message("connection timed out"),
            ErrorCategory::Network
        );
    }

    #[test]
    fn test_only_unavailable_advances_roster() {
        assert!(ErrorCategory::Unavailable.should_fallback());
        assert!(!ErrorCategory::Auth.should_fallback());
        assert!(!ErrorCategory::RateLimit.should_fallback());
        assert!(!ErrorCategory::BadRequest.should_fallback());
        assert!(!ErrorCategory::Transient.should_fallback());
    }

    #[test]
    fn test_is_unavailable() {
        let err = CuentasError::backend_status("gemini-2.0-flash", 404, "model not found");
        assert!(err.is_unavailable());

        let err = CuentasError::backend_status("gemini-2.0-flash", 401, "bad key");
        assert!(!err.is_unavailable());

        let err = CuentasError::Config("missing key".into());
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_malformed_preview_is_bounded() {
        let raw = "x".repeat(5000);
        let err = CuentasError::malformed("not JSON", &raw);
        match err {
            CuentasError::MalformedOutput { message, raw: kept } => {
                assert!(message.len() < 500);
                assert_eq!(kept.len(), 5000);
            }
            other => panic!("expected MalformedOutput, got {:?}", other),
        }
    }

    #[test]
    fn test_user_messages_are_nonempty() {
        let errors = [
            CuentasError::Config("x".into()),
            CuentasError::Input("x".into()),
            CuentasError::ImageDecode("x".into()),
            CuentasError::AllModelsUnavailable { attempted: 3 },
            CuentasError::backend_status("m", 500, "boom"),
            CuentasError::malformed("bad", "raw"),
            CuentasError::InvalidFormat {
                found: "object".into(),
            },
        ];
        for err in errors {
            assert!(!err.user_message().is_empty());
        }
    }
}
