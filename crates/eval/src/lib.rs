//! Session rule evaluator -- matches a session record against a catalog
//! of business rules and selects the message to surface.
//!
//! The pipeline:
//! 1. the catalog document is loaded once into a [`RuleCatalog`]
//!    (condition values compiled, malformed entries skipped);
//! 2. each evaluation walks the catalog, skipping expired rules and
//!    transcoding condition labels into record paths;
//! 3. the matches go through the selector, which picks one by priority,
//!    creation date and specificity.
//!
//! Nothing in an evaluation pass fails. Data-shape problems make a
//! condition false and are reported as [`Diagnostic`]s.

pub mod catalog;
pub mod condition;
pub mod diagnostics;
pub mod error;
pub mod numeric;
pub mod path;
pub mod predicate;
pub mod rules;
pub mod select;
pub mod transcode;
pub mod types;

use time::{Date, OffsetDateTime};

pub use catalog::RuleCatalog;
pub use diagnostics::Diagnostic;
pub use error::{CatalogError, DateError, RuleError};
pub use select::{CreatedAtOrder, SelectionPolicy, Specificity};
pub use transcode::TranscodingTable;
pub use types::{ConditionSpec, ConditionValue, Match, Record, Rule, SelectedResult};

/// Result of evaluating one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Every matched rule, in catalog order.
    pub matches: Vec<Match>,
    /// The match to surface, if any.
    pub selected: Option<SelectedResult>,
    /// Transcoding misses met during this pass.
    pub diagnostics: Vec<Diagnostic>,
}

impl Evaluation {
    /// The selected result as an output mapping, or `null`.
    pub fn to_json(&self) -> serde_json::Value {
        self.selected
            .as_ref()
            .map(SelectedResult::to_json)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// A loaded catalog with its transcoding table and selection policy.
///
/// The engine is immutable; one instance can serve any number of
/// concurrent evaluations.
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: RuleCatalog,
    table: TranscodingTable,
    policy: SelectionPolicy,
}

impl Engine {
    pub fn new(catalog: RuleCatalog, table: TranscodingTable) -> Self {
        Engine {
            catalog,
            table,
            policy: SelectionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn table(&self) -> &TranscodingTable {
        &self.table
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// Evaluate `record` as of today's UTC date.
    pub fn evaluate(&self, record: &Record) -> Evaluation {
        self.evaluate_at(record, OffsetDateTime::now_utc().date())
    }

    /// Evaluate `record` as of `today`. The date is fixed for the whole pass.
    pub fn evaluate_at(&self, record: &Record, today: Date) -> Evaluation {
        let pass = rules::apply_rules(record, self.catalog.rules(), &self.table, today);
        let selected = select::select_best(&pass.matches, &self.policy).map(SelectedResult::from);
        Evaluation {
            matches: pass.matches,
            selected,
            diagnostics: pass.diagnostics,
        }
    }
}

/// Load `catalog` and evaluate `record` against it as of today.
///
/// This is the one-shot entry point; long-lived callers should build an
/// [`Engine`] once and reuse it.
pub fn evaluate(
    record: &Record,
    catalog: &serde_json::Value,
    table: &TranscodingTable,
) -> Result<Evaluation, CatalogError> {
    let catalog = RuleCatalog::from_document(catalog)?;
    Ok(Engine::new(catalog, table.clone()).evaluate(record))
}

// ──────────────────────────────────────────────
// Integration tests
// ──────────────────────────────────────────────
