// crates/pve-bridge-catalog/src/args.rs
// ============================================================================
// Module: Handler Input Helpers
// Description: Extraction and rendering helpers for validated tool input.
// Purpose: Turn schema-validated JSON into path segments, bodies, and text.
// Dependencies: pve-bridge-core, serde_json
// ============================================================================

//! ## Overview
//! Tool input reaches handlers after JSON Schema validation, but path
//! parameters still need charset checks before they are interpolated into
//! backend URLs. These helpers centralize that discipline along with body
//! assembly and result rendering.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;
use std::fmt::Write as _;

use pve_bridge_core::ToolExecError;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Required Parameters
// ============================================================================

/// Extracts a required string field.
pub(crate) fn string(input: &Value, key: &str) -> Result<String, ToolExecError> {
    input
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ToolExecError::InvalidInput(format!("missing required field {key}")))
}

/// Extracts a required unsigned integer field.
pub(crate) fn unsigned(input: &Value, key: &str) -> Result<u64, ToolExecError> {
    input
        .get(key)
        .and_then(Value::as_u64)
        .ok_or_else(|| ToolExecError::InvalidInput(format!("missing required field {key}")))
}

/// Extracts a required string destined for a single URL path segment.
///
/// Rejects separators and whitespace so caller input cannot rewrite the
/// request path. Identifier punctuation used by node names, service names,
/// user ids, and task UPIDs is allowed.
pub(crate) fn segment(input: &Value, key: &str) -> Result<String, ToolExecError> {
    let value = string(input, key)?;
    if value.is_empty()
        || value.contains("..")
        || !value.chars().all(|c| c.is_ascii_alphanumeric() || "_.:@!-".contains(c))
    {
        return Err(ToolExecError::InvalidInput(format!(
            "field {key} is not a valid path segment"
        )));
    }
    Ok(value)
}

/// Extracts a required storage volume identifier.
///
/// Volume ids legitimately contain `/` (for example
/// `local:backup/vzdump-qemu-100.vma.zst`), so only traversal and whitespace
/// are rejected.
pub(crate) fn volume(input: &Value, key: &str) -> Result<String, ToolExecError> {
    let value = string(input, key)?;
    if value.is_empty()
        || value.contains("..")
        || !value.chars().all(|c| c.is_ascii_alphanumeric() || "_.:@!-/".contains(c))
    {
        return Err(ToolExecError::InvalidInput(format!(
            "field {key} is not a valid volume identifier"
        )));
    }
    Ok(value)
}

// ============================================================================
// SECTION: Optional Parameters
// ============================================================================

/// Extracts an optional string field.
pub(crate) fn opt_string(input: &Value, key: &str) -> Option<String> {
    input.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Extracts an optional unsigned integer field.
pub(crate) fn opt_unsigned(input: &Value, key: &str) -> Option<u64> {
    input.get(key).and_then(Value::as_u64)
}

// ============================================================================
// SECTION: Body Assembly
// ============================================================================

/// Copies the listed fields from the input into a request body when present.
///
/// Booleans are converted to `1`/`0`, which is what the backend expects for
/// flag parameters.
pub(crate) fn copy_fields(body: &mut Map<String, Value>, input: &Value, keys: &[&str]) {
    for key in keys {
        if let Some(value) = input.get(*key) {
            let value = match value {
                Value::Bool(flag) => Value::from(u8::from(*flag)),
                other => other.clone(),
            };
            body.insert((*key).to_string(), value);
        }
    }
}

// ============================================================================
// SECTION: Query Strings
// ============================================================================

/// Accumulates optional query pairs for list-style endpoints.
///
/// # Invariants
/// - Keys are static identifiers and values are numeric or
///   schema-constrained labels; no URL encoding is required.
pub(crate) struct Query {
    /// Rendered `key=value` pairs.
    pairs: Vec<String>,
}

impl Query {
    /// Creates an empty query accumulator.
    pub(crate) const fn new() -> Self {
        Self {
            pairs: Vec::new(),
        }
    }

    /// Appends a pair when the value is present.
    pub(crate) fn add(&mut self, key: &str, value: Option<impl Display>) {
        if let Some(value) = value {
            self.pairs.push(format!("{key}={value}"));
        }
    }

    /// Renders the path with the accumulated query string.
    pub(crate) fn apply(&self, path: &str) -> String {
        if self.pairs.is_empty() {
            return path.to_string();
        }
        let mut out = String::from(path);
        let _ = write!(out, "?{}", self.pairs.join("&"));
        out
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders a backend payload as pretty-printed JSON text.
pub(crate) fn render(value: &Value) -> Result<String, ToolExecError> {
    serde_json::to_string_pretty(value)
        .map_err(|_| ToolExecError::Failed("result serialization failed".to_string()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::use_debug,
        reason = "Test-only assertions favor direct unwrap/expect for clarity."
    )]

    use serde_json::json;

    use super::Query;
    use super::copy_fields;
    use super::segment;
    use super::volume;

    #[test]
    fn segment_accepts_identifier_punctuation() {
        let input = json!({"upid": "UPID:pve1:0001A2B3:004B:66F0:vzdump:100:root@pam!bridge:"});
        assert!(segment(&input, "upid").is_ok());
    }

    #[test]
    fn segment_rejects_separators_and_traversal() {
        for bad in ["a/b", "a b", "..", "x/../y", ""] {
            let input = json!({ "node": bad });
            assert!(segment(&input, "node").is_err(), "{bad:?} must be rejected");
        }
    }

    #[test]
    fn volume_accepts_slash_but_not_traversal() {
        let ok = json!({"volid": "local:backup/vzdump-qemu-100.vma.zst"});
        assert!(volume(&ok, "volid").is_ok());
        let bad = json!({"volid": "local:../etc/passwd"});
        assert!(volume(&bad, "volid").is_err());
    }

    #[test]
    fn copy_fields_converts_booleans_to_flags() {
        let input = json!({"online": true, "name": "web", "skipped": null});
        let mut body = serde_json::Map::new();
        copy_fields(&mut body, &input, &["online", "name", "missing"]);
        assert_eq!(body.get("online"), Some(&json!(1)));
        assert_eq!(body.get("name"), Some(&json!("web")));
        assert!(!body.contains_key("missing"));
    }

    #[test]
    fn query_renders_only_present_pairs() {
        let mut query = Query::new();
        query.add("limit", Some(50));
        query.add("vmid", None::<u64>);
        assert_eq!(query.apply("/nodes/pve1/tasks"), "/nodes/pve1/tasks?limit=50");
        assert_eq!(Query::new().apply("/nodes"), "/nodes");
    }
}
