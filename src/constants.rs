//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Model selection constants
pub mod models {
    /// Ordered candidate models, fastest/cheapest first.
    ///
    /// The roster walks this list top to bottom when a candidate is
    /// unavailable; discovery (ListModels) may replace it at runtime.
    pub const DEFAULT_CANDIDATES: &[&str] = &[
        "gemini-2.0-flash",
        "gemini-2.0-flash-lite",
        "gemini-1.5-flash",
        "gemini-1.5-pro",
    ];

    /// Generation method a discovered model must support to qualify
    pub const GENERATE_METHOD: &str = "generateContent";
}

/// HTTP/Network constants
pub mod network {
    /// Gemini REST endpoint base
    pub const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Environment variable holding the API key
    pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
}

/// Extraction tuning
pub mod extraction {
    /// Low temperature keeps item lists deterministic
    pub const DEFAULT_TEMPERATURE: f32 = 0.1;

    /// Maximum characters of raw model output kept in parse errors
    pub const RAW_PREVIEW_CHARS: usize = 200;
}

/// Image normalization constants
pub mod imaging {
    /// Longest edge after downscaling (pixels)
    pub const MAX_EDGE_PX: u32 = 1024;

    /// JPEG re-encode quality (1-100)
    pub const JPEG_QUALITY: u8 = 80;
}

/// Default display labels
pub mod labels {
    /// Placeholder when the model omits an item name
    pub const UNKNOWN_ITEM: &str = "Item desconocido";

    /// Seed participants created with a fresh ledger
    pub const SEED_PARTICIPANTS: &[&str] = &["Yo", "Amigo"];

    /// Prefix for auto-named participants ("Persona {id}")
    pub const PARTICIPANT_PREFIX: &str = "Persona";
}
