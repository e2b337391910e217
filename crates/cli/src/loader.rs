//! Reading catalogs and records from disk.
//!
//! Catalogs are YAML (the authoring format) or JSON, chosen by extension.
//! Records are always JSON.

use std::path::Path;

/// Read a rule catalog document.
pub fn read_catalog(path: &Path) -> Result<serde_json::Value, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&content)
            .map_err(|e| format!("invalid JSON in '{}': {}", path.display(), e))
    } else {
        serde_yaml::from_str(&content)
            .map_err(|e| format!("invalid YAML in '{}': {}", path.display(), e))
    }
}

/// Read a session record.
pub fn read_record(path: &Path) -> Result<serde_json::Value, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("invalid JSON in '{}': {}", path.display(), e))
}
