//! Numeric handling using `rust_decimal`.
//!
//! Record numbers and expression thresholds are both brought into
//! `Decimal` before comparing, so `0.1` in a record compares equal to a
//! `0.1` threshold. No `f64` arithmetic in the comparison path.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::condition::ComparisonOp;

/// Convert a JSON number into a `Decimal`.
///
/// Returns `None` for non-numbers and for numbers outside the `Decimal`
/// range. Booleans are not numbers.
pub fn decimal_from_json(v: &serde_json::Value) -> Option<Decimal> {
    let n = match v {
        serde_json::Value::Number(n) => n,
        _ => return None,
    };
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    // serde_json renders floats in their shortest round-trip form, which
    // keeps decimal literals like 45.5 exact.
    let repr = n.to_string();
    Decimal::from_str(&repr)
        .or_else(|_| Decimal::from_scientific(&repr))
        .ok()
}

/// Apply a comparison operator to two decimals.
pub fn compare(actual: Decimal, op: ComparisonOp, threshold: Decimal) -> bool {
    match op {
        ComparisonOp::Gt => actual > threshold,
        ComparisonOp::Lt => actual < threshold,
        ComparisonOp::Ge => actual >= threshold,
        ComparisonOp::Le => actual <= threshold,
        ComparisonOp::Eq => actual == threshold,
    }
}

/// Strict literal equality.
///
/// Values of different JSON types never compare equal (`"1"` is not `1`).
/// Two numbers compare by value, so `1` equals `1.0`.
pub fn literal_eq(actual: &serde_json::Value, expected: &serde_json::Value) -> bool {
    match (decimal_from_json(actual), decimal_from_json(expected)) {
        (Some(a), Some(e)) => a == e,
        _ => actual == expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_and_floats_convert() {
        assert_eq!(decimal_from_json(&json!(45)), Some(Decimal::from(45)));
        assert_eq!(decimal_from_json(&json!(-3)), Some(Decimal::from(-3)));
        assert_eq!(
            decimal_from_json(&json!(u64::MAX)),
            Some(Decimal::from(u64::MAX))
        );
        assert_eq!(
            decimal_from_json(&json!(45.5)),
            Some(Decimal::from_str("45.5").unwrap())
        );
        assert_eq!(
            decimal_from_json(&json!(0.1)),
            Some(Decimal::from_str("0.1").unwrap())
        );
    }

    #[test]
    fn non_numbers_do_not_convert() {
        assert_eq!(decimal_from_json(&json!("45")), None);
        assert_eq!(decimal_from_json(&json!(true)), None);
        assert_eq!(decimal_from_json(&json!(null)), None);
        assert_eq!(decimal_from_json(&json!([1])), None);
    }

    #[test]
    fn compare_all_operators() {
        let ten = Decimal::from(10);
        let five = Decimal::from(5);
        assert!(compare(ten, ComparisonOp::Gt, five));
        assert!(!compare(five, ComparisonOp::Gt, five));
        assert!(compare(five, ComparisonOp::Lt, ten));
        assert!(compare(five, ComparisonOp::Ge, five));
        assert!(compare(five, ComparisonOp::Le, five));
        assert!(!compare(ten, ComparisonOp::Le, five));
        assert!(compare(five, ComparisonOp::Eq, five));
        assert!(!compare(five, ComparisonOp::Eq, ten));
    }

    #[test]
    fn literal_equality_is_type_sensitive() {
        assert!(literal_eq(&json!(true), &json!(true)));
        assert!(!literal_eq(&json!(true), &json!("true")));
        assert!(!literal_eq(&json!("1"), &json!(1)));
        assert!(!literal_eq(&json!(1), &json!(true)));
        assert!(literal_eq(&json!("panne"), &json!("panne")));
        assert!(literal_eq(&json!(null), &json!(null)));
    }

    #[test]
    fn literal_equality_compares_numbers_by_value() {
        assert!(literal_eq(&json!(1), &json!(1.0)));
        assert!(literal_eq(&json!(2.50), &json!(2.5)));
        assert!(!literal_eq(&json!(2), &json!(3)));
    }
}
