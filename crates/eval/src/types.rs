//! Rule, condition and match types for the session rule evaluator.
//!
//! These are the typed forms of a loaded catalog. Condition values are
//! compiled once at load time into [`ConditionValue`], so evaluation never
//! has to sniff strings again.

use std::collections::BTreeMap;

use time::macros::format_description;
use time::Date;

use crate::condition::ParsedExpression;
use crate::error::DateError;

/// One session's collected data: an arbitrary tree of maps and sequences.
pub type Record = serde_json::Value;

// ──────────────────────────────────────────────
// Dates
// ──────────────────────────────────────────────

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<Date, DateError> {
    Date::parse(input.trim(), format_description!("[year]-[month]-[day]")).map_err(|_| {
        DateError {
            input: input.to_string(),
        }
    })
}

/// Render a date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

// ──────────────────────────────────────────────
// Conditions
// ──────────────────────────────────────────────

/// The expected side of a condition member.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    /// Strict, type-sensitive equality with the resolved value.
    Literal(serde_json::Value),
    /// Numeric comparisons joined by `or`.
    Expression(ParsedExpression),
}

/// One named condition within a rule: where to look, and what to expect.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSpec {
    /// Human label (transcoded at evaluation time) or a raw record path.
    pub path: String,
    pub value: ConditionValue,
}

impl ConditionSpec {
    pub fn new(path: impl Into<String>, value: ConditionValue) -> Self {
        ConditionSpec {
            path: path.into(),
            value,
        }
    }
}

// ──────────────────────────────────────────────
// Rules
// ──────────────────────────────────────────────

/// An author-defined rule. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub name: String,
    pub message: String,
    pub priority: i64,
    pub created_at: Date,
    /// Expiry date; `None` never expires.
    pub validity: Option<Date>,
    pub code: String,
    /// Condition label -> condition. All members must hold.
    pub condition_members: BTreeMap<String, ConditionSpec>,
}

impl Rule {
    /// A rule is expired when its validity date is strictly before `today`.
    pub fn is_expired(&self, today: Date) -> bool {
        matches!(self.validity, Some(v) if v < today)
    }
}

// ──────────────────────────────────────────────
// Matches and results
// ──────────────────────────────────────────────

/// A rule whose every condition member was satisfied by the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub name: String,
    pub message: String,
    pub priority: i64,
    pub created_at: Date,
    pub validity: Option<Date>,
    pub code: String,
    /// Number of condition members of the matched rule (specificity).
    pub condition_count: usize,
}

impl Match {
    pub(crate) fn from_rule(rule: &Rule) -> Self {
        Match {
            name: rule.name.clone(),
            message: rule.message.clone(),
            priority: rule.priority,
            created_at: rule.created_at,
            validity: rule.validity,
            code: rule.code.clone(),
            condition_count: rule.condition_members.len(),
        }
    }
}

/// The single match surfaced to the end user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedResult {
    pub name: String,
    pub message: String,
    pub priority: i64,
    pub created_at: Date,
    pub validity: Option<Date>,
    pub code: String,
}

impl From<&Match> for SelectedResult {
    fn from(m: &Match) -> Self {
        SelectedResult {
            name: m.name.clone(),
            message: m.message.clone(),
            priority: m.priority,
            created_at: m.created_at,
            validity: m.validity,
            code: m.code.clone(),
        }
    }
}

impl SelectedResult {
    /// Output mapping: name, message, priority, created_at, validity, code.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "message": self.message,
            "priority": self.priority,
            "created_at": format_date(self.created_at),
            "validity": self.validity.map(format_date),
            "code": self.code,
        })
    }
}
