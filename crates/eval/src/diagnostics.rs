//! Non-fatal anomalies found while loading or evaluating rules.
//!
//! Nothing here stops an evaluation. Each anomaly is logged through
//! `tracing` when recorded and kept in a list so callers and tests can
//! inspect it.

use std::fmt;

/// A reported, non-fatal anomaly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A catalog entry was skipped.
    MalformedRule {
        /// Position of the entry in the catalog document.
        index: usize,
        /// Rule name, when it could be read.
        name: Option<String>,
        reason: String,
    },
    /// An expression clause did not parse and was dropped.
    UnparsableClause {
        rule: String,
        label: String,
        clause: String,
    },
    /// A condition path was not in the transcoding table and was used as-is.
    TranscodingMiss {
        rule: String,
        label: String,
        path: String,
    },
}

impl Diagnostic {
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::MalformedRule { .. } => "malformed_rule",
            Diagnostic::UnparsableClause { .. } => "unparsable_clause",
            Diagnostic::TranscodingMiss { .. } => "transcoding_miss",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Diagnostic::MalformedRule {
                index,
                name,
                reason,
            } => serde_json::json!({
                "kind": self.kind(),
                "index": index,
                "name": name,
                "reason": reason,
            }),
            Diagnostic::UnparsableClause {
                rule,
                label,
                clause,
            } => serde_json::json!({
                "kind": self.kind(),
                "rule": rule,
                "label": label,
                "clause": clause,
            }),
            Diagnostic::TranscodingMiss { rule, label, path } => serde_json::json!({
                "kind": self.kind(),
                "rule": rule,
                "label": label,
                "path": path,
            }),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedRule {
                index,
                name: Some(name),
                reason,
            } => write!(f, "rule #{} '{}' skipped: {}", index, name, reason),
            Diagnostic::MalformedRule {
                index,
                name: None,
                reason,
            } => write!(f, "rule #{} skipped: {}", index, reason),
            Diagnostic::UnparsableClause {
                rule,
                label,
                clause,
            } => write!(
                f,
                "rule '{}', condition '{}': unparsable clause '{}' dropped",
                rule, label, clause
            ),
            Diagnostic::TranscodingMiss { rule, label, path } => write!(
                f,
                "rule '{}', condition '{}': no transcoding for '{}', used as raw path",
                rule, label, path
            ),
        }
    }
}

/// Accumulates diagnostics for one load or one evaluation pass.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollector {
    items: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        DiagnosticCollector { items: Vec::new() }
    }

    /// Record a diagnostic and log it. Exact duplicates are kept once.
    pub fn record(&mut self, diagnostic: Diagnostic) {
        if self.items.contains(&diagnostic) {
            return;
        }
        match &diagnostic {
            Diagnostic::MalformedRule { .. } => {
                tracing::error!(kind = diagnostic.kind(), "{}", diagnostic)
            }
            _ => tracing::warn!(kind = diagnostic.kind(), "{}", diagnostic),
        }
        self.items.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
