//! Cuentas - AI Receipt Scanning & Bill Splitting
//!
//! Turns a photographed restaurant receipt into a fair per-person
//! split: a Gemini vision model extracts the priced line items, the
//! ledger tracks who shares what, and the split calculator settles the
//! bill with even division across assignees.
//!
//! ## Core Features
//!
//! - **Model Fallback**: ordered candidate roster with optional
//!   discovery; unavailable models advance the roster, content errors
//!   surface immediately
//! - **Defensive Parsing**: code-fence stripping, strict array
//!   validation and per-record coercion of untrusted model output
//! - **Settlement Engine**: in-memory ledger with atomic mutations and
//!   fully recomputed per-person totals
//!
//! ## Quick Start
//!
//! ```ignore
//! use cuentas::{BillLedger, Config, ReceiptExtractor};
//!
//! let config = Config::default();
//! let extractor = ReceiptExtractor::from_env(&config)?;
//! let items = extractor.scan(&image_bytes, "image/jpeg").await?;
//!
//! let mut ledger = BillLedger::new();
//! ledger.initialize(items);
//! ledger.set_assignment(0, &[1, 2]);
//! let totals = ledger.totals();
//! ```
//!
//! ## Modules
//!
//! - [`extract`]: image normalization, Gemini client, fallback roster,
//!   output sanitization
//! - [`ledger`]: assignment state and settlement arithmetic
//! - [`config`]: layered configuration (defaults, file, env)
//! - [`types`]: shared data model and the unified error type

pub mod cli;
pub mod config;
pub mod constants;
pub mod extract;
pub mod ledger;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, ExtractionConfig, ImageConfig};

// Error Types
pub use types::error::{CuentasError, ErrorCategory, Result};

// Data Model
pub use types::{LineItem, Participant, RawItem};

// Extraction
pub use extract::{
    GeminiClient, InlineImage, ModelInfo, ModelRoster, ReceiptExtractor, VisionBackend,
    mime_for_path, normalize_image, parse_items,
};

// Settlement
pub use ledger::{BillLedger, Totals, compute_totals};
