//! Selection of the single match to surface.
//!
//! Ordering, best first:
//! 1. higher `priority`;
//! 2. `created_at`, oldest first by default;
//! 3. `condition_count`, fewest first by default.
//!
//! Keys 2 and 3 reproduce the long-standing behaviour of the rule service
//! and can be flipped through [`SelectionPolicy`]. Matches that tie on all
//! three keys resolve to the one earliest in catalog order.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::types::Match;

/// Which `created_at` wins among equal priorities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatedAtOrder {
    /// Smallest date ordinal wins.
    #[default]
    Oldest,
    Newest,
}

/// Which condition count wins among equal priority and date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specificity {
    #[default]
    Fewest,
    Most,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionPolicy {
    pub created_at: CreatedAtOrder,
    pub specificity: Specificity,
}

impl SelectionPolicy {
    /// `Greater` when `a` should be preferred over `b`.
    pub fn compare(&self, a: &Match, b: &Match) -> Ordering {
        let by_priority = a.priority.cmp(&b.priority);
        let by_date = match self.created_at {
            CreatedAtOrder::Oldest => b.created_at.cmp(&a.created_at),
            CreatedAtOrder::Newest => a.created_at.cmp(&b.created_at),
        };
        let by_count = match self.specificity {
            Specificity::Fewest => b.condition_count.cmp(&a.condition_count),
            Specificity::Most => a.condition_count.cmp(&b.condition_count),
        };
        by_priority.then(by_date).then(by_count)
    }
}

/// Pick the best match, or `None` when nothing matched.
pub fn select_best<'a>(matches: &'a [Match], policy: &SelectionPolicy) -> Option<&'a Match> {
    matches.iter().fold(None, |best, candidate| match best {
        Some(b) if policy.compare(candidate, b) != Ordering::Greater => Some(b),
        _ => Some(candidate),
    })
}
