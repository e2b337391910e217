//! Path resolution over nested records.
//!
//! A path is a string like `_embedded.documents[0].content.location`:
//! `.`, `[` and `]` all separate segments. Purely numeric segments index
//! sequences; every other segment is a map key. Resolution is total: any
//! mismatch between the path and the record shape yields `None`.

use serde_json::Value;

/// Split a path into its segments, skipping empty ones.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(['.', '[', ']']).filter(|s| !s.is_empty())
}

/// Resolve `path` against `record`. `None` means absent.
pub fn resolve<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    segments(path).try_fold(record, |current, segment| step(current, segment))
}

fn step<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    match current {
        Value::Array(items) => {
            if !segment.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let index: usize = segment.parse().ok()?;
            items.get(index)
        }
        Value::Object(map) => map.get(segment),
        _ => None,
    }
}
