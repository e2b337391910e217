//! Rule evaluation pass.
//!
//! Rules are evaluated in catalog order against one record. Expired rules
//! are skipped without evaluating their conditions. A rule matches when
//! every one of its condition members holds; a rule with no members
//! matches unconditionally.
//!
//! Transcoded paths live only for the duration of the pass. The catalog
//! and the transcoding table are borrowed immutably.

use time::Date;

use crate::diagnostics::{Diagnostic, DiagnosticCollector};
use crate::predicate::eval_condition;
use crate::transcode::TranscodingTable;
use crate::types::{Match, Record, Rule};

/// Matches produced by one pass, plus what went wrong softly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleEvaluation {
    /// Matched rules, in catalog order.
    pub matches: Vec<Match>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Evaluate all rules against `record` as of `today`.
pub fn apply_rules(
    record: &Record,
    rules: &[Rule],
    table: &TranscodingTable,
    today: Date,
) -> RuleEvaluation {
    let mut collector = DiagnosticCollector::new();
    let mut matches = Vec::new();

    for rule in rules {
        if rule.is_expired(today) {
            tracing::debug!(rule = %rule.name, "rule expired, skipped");
            continue;
        }
        if eval_rule(record, rule, table, &mut collector) {
            tracing::debug!(rule = %rule.name, priority = rule.priority, "rule matched");
            matches.push(Match::from_rule(rule));
        }
    }

    tracing::debug!(
        rules = rules.len(),
        matched = matches.len(),
        "rule evaluation finished"
    );

    RuleEvaluation {
        matches,
        diagnostics: collector.into_vec(),
    }
}

/// Evaluate one rule. All members are transcoded (so every miss gets
/// reported) before the conditions are checked.
fn eval_rule(
    record: &Record,
    rule: &Rule,
    table: &TranscodingTable,
    collector: &mut DiagnosticCollector,
) -> bool {
    let working: Vec<_> = rule
        .condition_members
        .iter()
        .map(|(label, spec)| {
            let tc = table.transcode(spec);
            if !tc.transcoded {
                collector.record(Diagnostic::TranscodingMiss {
                    rule: rule.name.clone(),
                    label: label.clone(),
                    path: spec.path.clone(),
                });
            }
            (label.as_str(), tc)
        })
        .collect();

    working
        .iter()
        .all(|(label, tc)| eval_condition(record, label, tc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConditionSpec, ConditionValue};
    use serde_json::json;
    use std::collections::BTreeMap;
    use time::macros::date;

    fn make_rule(
        name: &str,
        validity: Option<Date>,
        members: &[(&str, &str, serde_json::Value)],
    ) -> Rule {
        Rule {
            name: name.to_string(),
            message: format!("message for {}", name),
            priority: 1,
            created_at: date!(2023 - 01 - 01),
            validity,
            code: name.to_uppercase(),
            condition_members: members
                .iter()
                .map(|(label, path, value)| {
                    (
                        label.to_string(),
                        ConditionSpec::new(*path, ConditionValue::compile(value.clone())),
                    )
                })
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn table() -> TranscodingTable {
        [("autoroute", "location.isOnMotorway")].into_iter().collect()
    }

    const TODAY: Date = date!(2025 - 01 - 01);

    #[test]
    fn transcoded_literal_rule_matches() {
        let record = json!({ "location": { "isOnMotorway": true } });
        let rules = vec![make_rule("motorway", None, &[("autoroute", "autoroute", json!(true))])];
        let eval = apply_rules(&record, &rules, &table(), TODAY);
        assert_eq!(eval.matches.len(), 1);
        assert_eq!(eval.matches[0].name, "motorway");
        assert_eq!(eval.matches[0].condition_count, 1);
        assert!(eval.diagnostics.is_empty());
    }

    #[test]
    fn all_members_must_hold() {
        let record = json!({ "location": { "isOnMotorway": true }, "speed": 20 });
        let rules = vec![make_rule(
            "fast_on_motorway",
            None,
            &[
                ("autoroute", "autoroute", json!(true)),
                ("vitesse", "speed", json!(">30 or <10")),
            ],
        )];
        let eval = apply_rules(&record, &rules, &table(), TODAY);
        assert!(eval.matches.is_empty());

        let record = json!({ "location": { "isOnMotorway": true }, "speed": 45 });
        let eval = apply_rules(&record, &rules, &table(), TODAY);
        assert_eq!(eval.matches.len(), 1);
        assert_eq!(eval.matches[0].condition_count, 2);
    }

    #[test]
    fn expired_rules_never_match() {
        let record = json!({});
        let rules = vec![
            make_rule("expired", Some(date!(2020 - 01 - 01)), &[]),
            make_rule("last_day", Some(TODAY), &[]),
            make_rule("forever", None, &[]),
        ];
        let eval = apply_rules(&record, &rules, &table(), TODAY);
        let names: Vec<_> = eval.matches.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["last_day", "forever"]);
    }

    #[test]
    fn expired_rules_are_not_evaluated() {
        let record = json!({});
        let rules = vec![make_rule(
            "expired",
            Some(date!(2020 - 01 - 01)),
            &[("unknown label", "unknown label", json!(1))],
        )];
        let eval = apply_rules(&record, &rules, &table(), TODAY);
        assert!(eval.matches.is_empty());
        assert!(eval.diagnostics.is_empty());
    }

    #[test]
    fn empty_members_match_vacuously() {
        let rules = vec![make_rule("always", None, &[])];
        for record in [json!({}), json!(null), json!([1, 2])] {
            let eval = apply_rules(&record, &rules, &table(), TODAY);
            assert_eq!(eval.matches.len(), 1);
            assert_eq!(eval.matches[0].condition_count, 0);
        }
    }

    #[test]
    fn transcoding_miss_is_reported_and_path_used_raw() {
        let record = json!({ "speed": 45 });
        let rules = vec![make_rule("speed", None, &[("vitesse", "speed", json!(">30"))])];
        let eval = apply_rules(&record, &rules, &table(), TODAY);
        assert_eq!(eval.matches.len(), 1);
        assert_eq!(
            eval.diagnostics,
            vec![Diagnostic::TranscodingMiss {
                rule: "speed".to_string(),
                label: "vitesse".to_string(),
                path: "speed".to_string(),
            }]
        );
    }

    #[test]
    fn repeated_passes_are_independent() {
        let rules = vec![make_rule("motorway", None, &[("autoroute", "autoroute", json!(true))])];
        let t = table();
        let on = json!({ "location": { "isOnMotorway": true } });
        let off = json!({ "location": { "isOnMotorway": false } });

        assert_eq!(apply_rules(&on, &rules, &t, TODAY).matches.len(), 1);
        assert_eq!(apply_rules(&off, &rules, &t, TODAY).matches.len(), 0);
        assert_eq!(apply_rules(&on, &rules, &t, TODAY).matches.len(), 1);

        assert_eq!(rules[0].condition_members["autoroute"].path, "autoroute");
        assert_eq!(t, table());
    }

    #[test]
    fn matches_keep_catalog_order() {
        let record = json!({ "a": 1 });
        let rules = vec![
            make_rule("second", None, &[("a", "a", json!(1))]),
            make_rule("miss", None, &[("a", "a", json!(2))]),
            make_rule("first", None, &[]),
        ];
        let eval = apply_rules(&record, &rules, &table(), TODAY);
        let names: Vec<_> = eval.matches.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["second", "first"]);
    }
}
