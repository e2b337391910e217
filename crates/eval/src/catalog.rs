//! Rule catalog loading.
//!
//! The catalog arrives as an already-parsed document (YAML or JSON read by
//! the caller). Each entry carries its fields under a `conditions` block:
//!
//! ```yaml
//! - conditions:
//!     name: motorway_breakdown
//!     message: "..."
//!     priority: 5
//!     created_at: 2023-01-01
//!     validity: 2030-12-31
//!     code: AUTO_01
//!     condition_members:
//!       autoroute: { path: autoroute, value: true }
//! ```
//!
//! A malformed entry is skipped and reported; the rest of the catalog
//! still loads. Condition values are compiled here, once.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::diagnostics::{Diagnostic, DiagnosticCollector};
use crate::error::{json_type_name, CatalogError, RuleError};
use crate::transcode::TranscodingTable;
use crate::types::{parse_date, ConditionSpec, ConditionValue, Rule};

/// A loaded, immutable set of rules in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
    diagnostics: Vec<Diagnostic>,
}

impl RuleCatalog {
    /// Build a catalog from rules constructed in code.
    pub fn new(rules: Vec<Rule>) -> Self {
        RuleCatalog {
            rules,
            diagnostics: Vec::new(),
        }
    }

    /// Load a catalog document.
    ///
    /// Accepts either a sequence of entries or a mapping whose `rules` key
    /// holds that sequence.
    pub fn from_document(doc: &Value) -> Result<RuleCatalog, CatalogError> {
        let entries = match doc {
            Value::Array(entries) => entries,
            Value::Object(map) => match map.get("rules") {
                Some(Value::Array(entries)) => entries,
                Some(other) => {
                    return Err(CatalogError::NotARuleList {
                        got: json_type_name(other),
                    })
                }
                None => {
                    return Err(CatalogError::NotARuleList {
                        got: "mapping without 'rules'",
                    })
                }
            },
            other => {
                return Err(CatalogError::NotARuleList {
                    got: json_type_name(other),
                })
            }
        };

        let mut collector = DiagnosticCollector::new();
        let mut rules = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match parse_rule(entry) {
                Ok(rule) => {
                    report_rejected_clauses(&rule, &mut collector);
                    rules.push(rule);
                }
                Err(e) => collector.record(Diagnostic::MalformedRule {
                    index,
                    name: entry_name(entry),
                    reason: e.to_string(),
                }),
            }
        }

        tracing::debug!(
            loaded = rules.len(),
            entries = entries.len(),
            "rule catalog loaded"
        );

        Ok(RuleCatalog {
            rules,
            diagnostics: collector.into_vec(),
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Anomalies found while loading: skipped entries and dropped clauses.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Condition paths that `table` does not know, across all rules
    /// (expired ones included). These are used as raw record paths at
    /// evaluation time.
    pub fn transcoding_misses(&self, table: &TranscodingTable) -> Vec<Diagnostic> {
        self.rules
            .iter()
            .flat_map(|rule| {
                rule.condition_members
                    .iter()
                    .filter(move |(_, spec)| !table.transcode(spec).transcoded)
                    .map(move |(label, spec)| Diagnostic::TranscodingMiss {
                        rule: rule.name.clone(),
                        label: label.clone(),
                        path: spec.path.clone(),
                    })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn report_rejected_clauses(rule: &Rule, collector: &mut DiagnosticCollector) {
    for (label, spec) in &rule.condition_members {
        for clause in spec.value.rejected_clauses() {
            collector.record(Diagnostic::UnparsableClause {
                rule: rule.name.clone(),
                label: label.clone(),
                clause: clause.clone(),
            });
        }
    }
}

/// Best-effort rule name for diagnostics on a broken entry.
fn entry_name(entry: &Value) -> Option<String> {
    entry
        .get("conditions")
        .and_then(|c| c.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Parse a single catalog entry.
pub fn parse_rule(entry: &Value) -> Result<Rule, RuleError> {
    let entry = entry.as_object().ok_or(RuleError::NotAMapping {
        got: json_type_name(entry),
    })?;
    let block = match entry.get("conditions") {
        Some(Value::Object(block)) => block,
        Some(other) => {
            return Err(RuleError::WrongType {
                field: "conditions",
                expected: "a mapping",
                got: json_type_name(other),
            })
        }
        None => return Err(RuleError::MissingConditions),
    };

    let name = get_str(block, "name")?;
    let message = get_str(block, "message")?;
    let code = get_code(block)?;
    let priority = get_int(block, "priority")?;
    let created_at = get_date(block, "created_at")?
        .ok_or(RuleError::MissingField { field: "created_at" })?;
    let validity = get_date(block, "validity")?;
    let condition_members = parse_members(block.get("condition_members"))?;

    Ok(Rule {
        name,
        message,
        priority,
        created_at,
        validity,
        code,
        condition_members,
    })
}

fn parse_members(v: Option<&Value>) -> Result<BTreeMap<String, ConditionSpec>, RuleError> {
    let members = match v {
        None | Some(Value::Null) => return Ok(BTreeMap::new()),
        Some(Value::Object(m)) => m,
        Some(other) => {
            return Err(RuleError::WrongType {
                field: "condition_members",
                expected: "a mapping",
                got: json_type_name(other),
            })
        }
    };

    let mut out = BTreeMap::new();
    for (label, member) in members {
        let invalid = || RuleError::InvalidMember {
            label: label.clone(),
        };
        let path = member
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(invalid)?;
        let value = member.get("value").ok_or_else(invalid)?;
        out.insert(
            label.clone(),
            ConditionSpec::new(path, ConditionValue::compile(value.clone())),
        );
    }
    Ok(out)
}

type Block = serde_json::Map<String, Value>;

fn get_str(block: &Block, field: &'static str) -> Result<String, RuleError> {
    match block.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err(RuleError::MissingField { field }),
        Some(other) => Err(RuleError::WrongType {
            field,
            expected: "a string",
            got: json_type_name(other),
        }),
    }
}

/// Codes such as 101 are commonly written unquoted.
fn get_code(block: &Block) -> Result<String, RuleError> {
    match block.get("code") {
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => get_str(block, "code"),
    }
}

fn get_int(block: &Block, field: &'static str) -> Result<i64, RuleError> {
    match block.get(field) {
        Some(Value::Number(n)) => n.as_i64().ok_or(RuleError::WrongType {
            field,
            expected: "an integer",
            got: "a fractional or out-of-range number",
        }),
        Some(Value::Null) | None => Err(RuleError::MissingField { field }),
        Some(other) => Err(RuleError::WrongType {
            field,
            expected: "an integer",
            got: json_type_name(other),
        }),
    }
}

fn get_date(block: &Block, field: &'static str) -> Result<Option<time::Date>, RuleError> {
    match block.get(field) {
        Some(Value::String(s)) => parse_date(s)
            .map(Some)
            .map_err(|source| RuleError::InvalidDate { field, source }),
        Some(Value::Null) | None => Ok(None),
        Some(other) => Err(RuleError::WrongType {
            field,
            expected: "a YYYY-MM-DD string",
            got: json_type_name(other),
        }),
    }
}
