//! Common types used throughout pagekit
//!
//! Type aliases shared across modules and a small dotted-path JSON lookup
//! used by the HTTP client configuration.

use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// JSON Path Lookup
// ============================================================================

/// Walk a dotted path (e.g. `"meta.total_pages"`) into a JSON value.
///
/// A leading `$.` prefix is accepted and stripped. Returns `None` when any
/// segment is missing or an intermediate value is not an object.
pub fn extract_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        current = current.as_object()?.get(part)?;
    }

    Some(current)
}
