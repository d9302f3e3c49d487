//! Instruction text → per-kind question quota.
//!
//! The grammar is an ordered table of `(kind, alias pattern)` rules. Each rule
//! matches `<integer> <optional whitespace> <alias>` anywhere in the text,
//! case-insensitively, and every match for a kind is summed. When no kind
//! matches, a bare `<integer> questions|items` phrase still sets the total.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::domain::{QuestionKind, Quota};

pub struct KindAlias {
    pub kind: QuestionKind,
    pub pattern: &'static str,
}

pub const KIND_ALIASES: &[KindAlias] = &[
    KindAlias {
        kind: QuestionKind::Mcq,
        pattern: r"mcqs?|multiple[\s-]+choice(?:\s+questions?)?",
    },
    KindAlias {
        kind: QuestionKind::ShortAnswer,
        pattern: r"short[\s-]?answers?(?:\s+questions?)?",
    },
    KindAlias {
        kind: QuestionKind::TrueFalse,
        pattern: r"true\s*(?:or|/|-)?\s*false(?:\s+questions?)?|tf\b",
    },
    KindAlias {
        kind: QuestionKind::Essay,
        pattern: r"essays?(?:\s+questions?)?",
    },
];

const BARE_TOTAL_PATTERN: &str = r"(?i)\b(\d+)\s+(?:questions?|items?)\b";

static DEFAULT_GRAMMAR: Lazy<QuotaGrammar> = Lazy::new(|| {
    QuotaGrammar::new(KIND_ALIASES).expect("built-in quota grammar is a valid regex set")
});

pub struct QuotaGrammar {
    rules: Vec<(QuestionKind, Regex)>,
    bare_total: Regex,
}

impl QuotaGrammar {
    pub fn new(aliases: &[KindAlias]) -> Result<Self, regex::Error> {
        let rules = aliases
            .iter()
            .map(|alias| {
                Regex::new(&format!(r"(?i)\b(\d+)\s*(?:{})", alias.pattern))
                    .map(|regex| (alias.kind, regex))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules,
            bare_total: Regex::new(BARE_TOTAL_PATTERN)?,
        })
    }

    pub fn derive(&self, instructions: &str) -> Quota {
        let mut quota = Quota::default();

        for (kind, regex) in &self.rules {
            for captures in regex.captures_iter(instructions) {
                let Some(count) = captures.get(1).and_then(|m| m.as_str().parse::<u32>().ok())
                else {
                    continue;
                };
                let entry = quota.per_kind.entry(*kind).or_insert(0);
                *entry = entry.saturating_add(count);
            }
        }

        quota.total = if quota.has_kinds() {
            Some(quota.per_kind.values().fold(0u32, |acc, n| acc.saturating_add(*n)))
        } else {
            self.bare_total
                .captures(instructions)
                .and_then(|captures| captures.get(1))
                .and_then(|m| m.as_str().parse().ok())
        };

        quota
    }
}

/// Derives a quota with the built-in alias table.
pub fn derive_quota(instructions: &str) -> Quota {
    DEFAULT_GRAMMAR.derive(instructions)
}
