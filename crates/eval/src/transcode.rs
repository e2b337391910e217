//! Translation of human-readable condition labels into record paths.
//!
//! Rule authors write `autoroute`; the record stores the value under
//! `_embedded.documents[0].content.collectedData.location.isOnMotorway`.
//! The table is built once and only ever read afterwards. Transcoding
//! borrows from both the table and the condition, so neither can be
//! modified by an evaluation.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::types::{ConditionSpec, ConditionValue};

/// Label -> raw path mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscodingTable {
    entries: BTreeMap<String, String>,
}

/// A condition with its path resolved for one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodedCondition<'a> {
    pub path: Cow<'a, str>,
    pub value: &'a ConditionValue,
    /// `false` when the label was not in the table and the path was kept.
    pub transcoded: bool,
}

impl TranscodingTable {
    pub fn new() -> Self {
        TranscodingTable {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, label: impl Into<String>, path: impl Into<String>) {
        self.entries.insert(label.into(), path.into());
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Resolve the path of `spec`. Unknown labels pass through unchanged.
    pub fn transcode<'a>(&'a self, spec: &'a ConditionSpec) -> TranscodedCondition<'a> {
        match self.get(&spec.path) {
            Some(raw) => TranscodedCondition {
                path: Cow::Borrowed(raw),
                value: &spec.value,
                transcoded: true,
            },
            None => TranscodedCondition {
                path: Cow::Borrowed(spec.path.as_str()),
                value: &spec.value,
                transcoded: false,
            },
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TranscodingTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        TranscodingTable {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for TranscodingTable {
    fn from(entries: BTreeMap<String, String>) -> Self {
        TranscodingTable { entries }
    }
}
