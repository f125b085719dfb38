//! Before/after rendering of scheduler app state.
//!
//! Purely for operator eyes: the diff never feeds back into control
//! flow or success determination.

use serde_json::{Map, Value};
use similar::TextDiff;

use skylift_marathon::AppState;

/// Canonical JSON for an app state: sorted keys, two-space indent.
/// An absent app renders as the empty object. Scheduler timestamps
/// arrive as ISO-8601 strings and pass through verbatim.
pub fn canonical_json(state: Option<&AppState>) -> String {
    let value = state
        .map(|s| serde_json::to_value(s).unwrap_or(Value::Null))
        .unwrap_or_else(|| Value::Object(Map::new()));
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

/// Unified diff of the canonicalized before/after states.
pub fn render_diff(before: Option<&AppState>, after: Option<&AppState>) -> String {
    let old = canonical_json(before);
    let new = canonical_json(after);
    TextDiff::from_lines(&old, &new)
        .unified_diff()
        .header("before", "after")
        .to_string()
}
