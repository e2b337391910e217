//! Error types for catalog loading.
//!
//! Evaluation itself never fails: anomalies in the record or in a single
//! rule degrade to "no match" and are reported as [`Diagnostic`]s. The
//! errors here cover the cases where there is nothing to evaluate at all.
//!
//! [`Diagnostic`]: crate::diagnostics::Diagnostic

/// The catalog document could not be interpreted as a list of rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The top-level document is neither a sequence nor a mapping with a
    /// `rules` sequence.
    #[error("rule catalog must be a sequence or a mapping with a 'rules' sequence, got {got}")]
    NotARuleList { got: &'static str },
}

/// A single catalog entry is unusable. The loader turns these into
/// [`Diagnostic::MalformedRule`](crate::diagnostics::Diagnostic::MalformedRule)
/// and moves on to the next entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("rule entry must be a mapping, got {got}")]
    NotAMapping { got: &'static str },

    #[error("rule entry has no 'conditions' block")]
    MissingConditions,

    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("field '{field}' must be {expected}, got {got}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        got: &'static str,
    },

    #[error("field '{field}': {source}")]
    InvalidDate {
        field: &'static str,
        source: DateError,
    },

    #[error("condition member '{label}' must be a mapping with 'path' and 'value'")]
    InvalidMember { label: String },
}

/// A date string is not a `YYYY-MM-DD` calendar date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date '{input}', expected YYYY-MM-DD")]
pub struct DateError {
    pub input: String,
}

/// Short type label for a JSON value, used in error messages.
pub(crate) fn json_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "sequence",
        serde_json::Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_error_messages_name_the_field() {
        let e = RuleError::MissingField { field: "priority" };
        assert_eq!(e.to_string(), "missing required field 'priority'");

        let e = RuleError::InvalidDate {
            field: "validity",
            source: DateError {
                input: "31/12/2024".to_string(),
            },
        };
        assert_eq!(
            e.to_string(),
            "field 'validity': invalid date '31/12/2024', expected YYYY-MM-DD"
        );
    }

    #[test]
    fn json_type_names() {
        assert_eq!(json_type_name(&serde_json::json!(null)), "null");
        assert_eq!(json_type_name(&serde_json::json!([1])), "sequence");
        assert_eq!(json_type_name(&serde_json::json!({"a": 1})), "mapping");
    }
}
