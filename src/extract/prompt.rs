//! Extraction Instructions
//!
//! The prompt and response schema sent with every receipt image.

use serde_json::{Value, json};

/// Instruction payload for the receipt-extraction task.
///
/// Keeps the model on purchased items only: subtotal, tax, tip and
/// grand-total lines are explicitly excluded, quantities are folded
/// into item names, prices must be plain numbers.
pub const EXTRACTION_PROMPT: &str = "\
Analyze this restaurant receipt and extract every purchased item with its price. \
Respond ONLY with a JSON array of objects, each with a \"name\" (string) and a \
\"price\" (number) field. Rules: include only purchased goods and services; do NOT \
include subtotal, tax, tip or grand-total lines; if a line shows a quantity, fold \
it into the item name (e.g. \"2x Cola\") with the combined price; prices must be \
plain numbers without currency symbols. If no items are readable, return an empty \
array [].";

/// JSON schema constraining the response to an array of `{name, price}`
/// records (Gemini `responseSchema`, OpenAPI-style uppercase types)
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "description": "Line items on the receipt.",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": {
                    "type": "STRING",
                    "description": "Item name."
                },
                "price": {
                    "type": "NUMBER",
                    "description": "Item price."
                }
            },
            "required": ["name", "price"]
        }
    })
}
