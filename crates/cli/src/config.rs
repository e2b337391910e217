//! `ceh.toml` configuration.
//!
//! ```toml
//! rules = "rules/breakdown.yaml"
//!
//! [selection]
//! created_at = "oldest"   # or "newest"
//! specificity = "fewest"  # or "most"
//!
//! [transcoding]
//! "autoroute" = "_embedded.documents[0].content.collectedData.location.isOnMotorway"
//! ```
//!
//! Every key is optional. Without a `[transcoding]` table the built-in
//! breakdown-assistance labels are used.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ceh_eval::{SelectionPolicy, TranscodingTable};
use serde::Deserialize;

use crate::transcoding;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Catalog used when `--rules` is not given. Relative paths are
    /// resolved against the config file's directory.
    pub rules: Option<PathBuf>,
    pub selection: SelectionPolicy,
    /// Replaces the built-in table when present.
    pub transcoding: Option<BTreeMap<String, String>>,
}

impl Config {
    /// The transcoding table this configuration selects.
    pub fn transcoding_table(&self) -> TranscodingTable {
        match &self.transcoding {
            Some(entries) => TranscodingTable::from(entries.clone()),
            None => transcoding::builtin(),
        }
    }
}

/// Read and parse a config file. Returns a human-readable error string on
/// failure.
pub fn read_config(path: &Path) -> Result<Config, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    let mut config: Config = toml::from_str(&content)
        .map_err(|e| format!("could not parse '{}': {}", path.display(), e))?;
    if let (Some(rules), Some(dir)) = (&config.rules, path.parent()) {
        if rules.is_relative() {
            config.rules = Some(dir.join(rules));
        }
    }
    Ok(config)
}
