// crates/pve-bridge-catalog/src/schema.rs
// ============================================================================
// Module: Input Contract Helpers
// Description: JSON Schema composition for tool input contracts.
// Purpose: Keep catalog schemas uniform and additionalProperties-closed.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Every tool input contract is a closed object schema built from these
//! helpers. Unknown fields are rejected at validation time rather than
//! silently forwarded to the backend.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Schema Builders
// ============================================================================

/// Builds a closed object schema from property definitions.
pub(crate) fn object(properties: &[(&str, Value)], required: &[&str]) -> Value {
    let mut map = Map::new();
    for (name, schema) in properties {
        map.insert((*name).to_string(), schema.clone());
    }
    json!({
        "type": "object",
        "properties": Value::Object(map),
        "required": required,
        "additionalProperties": false,
    })
}

/// Builds an empty object schema for tools taking no input.
pub(crate) fn empty() -> Value {
    object(&[], &[])
}

/// Builds a string property.
pub(crate) fn string(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

/// Builds an integer property.
pub(crate) fn integer(description: &str) -> Value {
    json!({"type": "integer", "description": description})
}

/// Builds a boolean property.
pub(crate) fn boolean(description: &str) -> Value {
    json!({"type": "boolean", "description": description})
}

/// Builds a free-form object property for settings passthrough.
pub(crate) fn raw_object(description: &str) -> Value {
    json!({"type": "object", "description": description})
}
