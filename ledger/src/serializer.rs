//! Canonical rendering of ledger objects for diagnostics.
//!
//! Output is stable for a given value but must never be hashed or persisted.

use serde::Serialize;

/// Render a value as pretty JSON.
///
/// Diagnostics are produced on failure paths, so this never fails: a value
/// that cannot be serialized is rendered as a placeholder carrying the error.
pub fn to_canonical_string<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => rendered,
        Err(e) => format!("<unserializable: {}>", e),
    }
}
