use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::domain::question::QuestionKind;

/// Per-kind question counts requested by an instructor, plus the overall
/// total. Kinds iterate in rendering order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Quota {
    pub per_kind: BTreeMap<QuestionKind, u32>,
    pub total: Option<u32>,
}

impl Quota {
    pub fn has_kinds(&self) -> bool {
        !self.per_kind.is_empty()
    }

    pub fn count_for(&self, kind: QuestionKind) -> u32 {
        self.per_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Human readable list such as `3 mcq, 2 short answer`.
    pub fn summary(&self) -> String {
        self.per_kind
            .iter()
            .map(|(kind, count)| format!("{} {}", count, kind.as_str().replace('_', " ")))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
