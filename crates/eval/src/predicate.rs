//! Condition member evaluation.
//!
//! A member holds when the value found at its path satisfies its
//! expected side: strict equality for literals, any one clause for
//! expressions. An absent value satisfies nothing.

use crate::numeric;
use crate::path;
use crate::transcode::TranscodedCondition;
use crate::types::{ConditionValue, Record};

/// Evaluate one condition member against the record.
pub fn eval_condition(record: &Record, label: &str, condition: &TranscodedCondition<'_>) -> bool {
    let actual = match path::resolve(record, &condition.path) {
        Some(v) => v,
        None => {
            tracing::debug!(label, path = %condition.path, "path absent in record");
            return false;
        }
    };
    let held = eval_value(actual, condition.value);
    tracing::trace!(label, path = %condition.path, held, "condition evaluated");
    held
}

/// Test a resolved value against the expected side of a condition.
pub fn eval_value(actual: &serde_json::Value, expected: &ConditionValue) -> bool {
    match expected {
        ConditionValue::Literal(lit) => numeric::literal_eq(actual, lit),
        ConditionValue::Expression(parsed) => {
            let Some(n) = numeric::decimal_from_json(actual) else {
                return false;
            };
            parsed
                .comparisons
                .iter()
                .any(|c| numeric::compare(n, c.op, c.threshold))
        }
    }
}
