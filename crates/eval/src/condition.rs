//! Comparison expression language for condition values.
//!
//! A condition value is either a literal or a small expression such as
//! `">30 or <10"`: numeric comparisons joined by the lowercase keyword
//! `or`. Which one it is gets decided lexically, once, when the catalog is
//! loaded ([`ConditionValue::compile`]).

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::types::ConditionValue;

/// `[operator] number`, where the operator defaults to `=`. Searched for
/// anywhere in the clause, so trailing units (`>30 km/h`) are ignored.
static CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(>=|<=|>|<|=)?\s*(-?[0-9]+(?:\.[0-9]+)?)").expect("valid clause regex")
});

/// The `or` keyword as a standalone word.
static OR_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|\s)or(\s|$)").expect("valid keyword regex"));

/// Comparison operators accepted in an expression clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
}

impl ComparisonOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Le => "<=",
            ComparisonOp::Eq => "=",
        }
    }

    fn from_symbol(s: &str) -> Option<Self> {
        match s {
            ">" => Some(ComparisonOp::Gt),
            "<" => Some(ComparisonOp::Lt),
            ">=" => Some(ComparisonOp::Ge),
            "<=" => Some(ComparisonOp::Le),
            "=" => Some(ComparisonOp::Eq),
            _ => None,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One `(operator, threshold)` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub op: ComparisonOp,
    pub threshold: Decimal,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.threshold)
    }
}

/// Result of parsing an expression.
///
/// `comparisons` keeps source order. Clauses that did not match the clause
/// grammar are dropped from `comparisons` and listed in `rejected`, so the
/// weakening is visible to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedExpression {
    pub comparisons: Vec<Comparison>,
    pub rejected: Vec<String>,
}

/// Parse an `or`-joined list of numeric comparisons.
///
/// ```
/// use ceh_eval::condition::{parse_expression, ComparisonOp};
///
/// let parsed = parse_expression(">30 or <10");
/// assert_eq!(parsed.comparisons[0].op, ComparisonOp::Gt);
/// assert_eq!(parsed.comparisons[1].op, ComparisonOp::Lt);
/// assert!(parsed.rejected.is_empty());
/// ```
pub fn parse_expression(expr: &str) -> ParsedExpression {
    let mut parsed = ParsedExpression::default();
    for clause in expr.split("or").map(str::trim) {
        match parse_clause(clause) {
            Some(c) => parsed.comparisons.push(c),
            None => parsed.rejected.push(clause.to_string()),
        }
    }
    parsed
}

fn parse_clause(clause: &str) -> Option<Comparison> {
    let caps = CLAUSE.captures(clause)?;
    let op = match caps.get(1) {
        Some(m) => ComparisonOp::from_symbol(m.as_str())?,
        None => ComparisonOp::Eq,
    };
    let threshold = Decimal::from_str(caps.get(2)?.as_str()).ok()?;
    Some(Comparison { op, threshold })
}

/// Whether a string condition value is written in the expression grammar:
/// it mentions `>` or `<`, or uses `or` as a word.
pub fn is_expression(value: &str) -> bool {
    value.contains('>') || value.contains('<') || OR_WORD.is_match(value)
}

impl ConditionValue {
    /// Compile an authored condition value.
    pub fn compile(value: serde_json::Value) -> ConditionValue {
        match value {
            serde_json::Value::String(s) if is_expression(&s) => {
                ConditionValue::Expression(parse_expression(&s))
            }
            other => ConditionValue::Literal(other),
        }
    }

    /// Clauses dropped while parsing; empty for literals.
    pub fn rejected_clauses(&self) -> &[String] {
        match self {
            ConditionValue::Expression(p) => &p.rejected,
            ConditionValue::Literal(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn parse_or_expression_in_source_order() {
        let parsed = parse_expression(">30 or <10");
        assert_eq!(
            parsed.comparisons,
            vec![
                Comparison {
                    op: ComparisonOp::Gt,
                    threshold: dec("30.0"),
                },
                Comparison {
                    op: ComparisonOp::Lt,
                    threshold: dec("10.0"),
                },
            ]
        );
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn parse_two_character_operators() {
        let parsed = parse_expression(">= 2.5 or <= -1");
        assert_eq!(parsed.comparisons[0].op, ComparisonOp::Ge);
        assert_eq!(parsed.comparisons[0].threshold, dec("2.5"));
        assert_eq!(parsed.comparisons[1].op, ComparisonOp::Le);
        assert_eq!(parsed.comparisons[1].threshold, dec("-1"));
    }

    #[test]
    fn missing_operator_means_equality() {
        let parsed = parse_expression("3 or >10");
        assert_eq!(parsed.comparisons[0].op, ComparisonOp::Eq);
        assert_eq!(parsed.comparisons[0].threshold, dec("3"));
        assert_eq!(parsed.comparisons[1].op, ComparisonOp::Gt);
    }

    #[test]
    fn unparsable_clauses_are_dropped_and_reported() {
        let parsed = parse_expression(">30 or beaucoup or <");
        assert_eq!(parsed.comparisons.len(), 1);
        assert_eq!(parsed.comparisons[0].op, ComparisonOp::Gt);
        assert_eq!(parsed.rejected, vec!["beaucoup", "<"]);
    }

    #[test]
    fn keyword_is_case_sensitive() {
        // Not split: the clause is ">30 OR <10" and only its first
        // comparison is found.
        let parsed = parse_expression(">30 OR <10");
        assert_eq!(
            parsed.comparisons,
            vec![Comparison {
                op: ComparisonOp::Gt,
                threshold: dec("30"),
            }]
        );
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn units_around_the_comparison_are_ignored() {
        let parsed = parse_expression(">30 km/h or <10 km/h");
        assert_eq!(
            parsed.comparisons,
            vec![
                Comparison {
                    op: ComparisonOp::Gt,
                    threshold: dec("30"),
                },
                Comparison {
                    op: ComparisonOp::Lt,
                    threshold: dec("10"),
                },
            ]
        );
        assert!(parsed.rejected.is_empty());

        let parsed = parse_expression("vitesse >= 2.5 bar");
        assert_eq!(parsed.comparisons[0].op, ComparisonOp::Ge);
        assert_eq!(parsed.comparisons[0].threshold, dec("2.5"));
    }

    #[test]
    fn comparison_display() {
        let c = Comparison {
            op: ComparisonOp::Ge,
            threshold: dec("12.5"),
        };
        assert_eq!(c.to_string(), ">=12.5");
    }

    #[test]
    fn expression_sniffing() {
        assert!(is_expression(">30"));
        assert!(is_expression("<= 4"));
        assert!(is_expression("3 or 4"));
        assert!(!is_expression("motorway"));
        assert!(!is_expression("accident corporel"));
        assert!(!is_expression("=5"));
    }

    #[test]
    fn compile_splits_literals_from_expressions() {
        assert_eq!(
            ConditionValue::compile(json!(true)),
            ConditionValue::Literal(json!(true))
        );
        assert_eq!(
            ConditionValue::compile(json!("panne")),
            ConditionValue::Literal(json!("panne"))
        );
        assert_eq!(
            ConditionValue::compile(json!(30)),
            ConditionValue::Literal(json!(30))
        );
        match ConditionValue::compile(json!(">30 or nope")) {
            ConditionValue::Expression(p) => {
                assert_eq!(p.comparisons.len(), 1);
                assert_eq!(p.rejected, vec!["nope"]);
            }
            other => panic!("expected expression, got {:?}", other),
        }
    }

    #[test]
    fn rejected_clauses_of_literal_is_empty() {
        assert!(ConditionValue::compile(json!("x"))
            .rejected_clauses()
            .is_empty());
        assert_eq!(
            ConditionValue::compile(json!("<1 or x")).rejected_clauses(),
            ["x".to_string()]
        );
    }
}
