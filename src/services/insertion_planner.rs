use serde::Serialize;

use crate::models::domain::Question;

/// Result of splicing new questions into an existing list. Nothing here has
/// been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertionPlan {
    pub preview_questions: Vec<Question>,
    pub merged_questions: Vec<Question>,
    pub insert_index: usize,
}

/// Clamps a requested position into `[0, len]`.
pub fn clamp_insert_index(requested: i64, len: usize) -> usize {
    if requested <= 0 {
        0
    } else {
        usize::try_from(requested).map_or(len, |index| index.min(len))
    }
}

/// Splices `new_questions` into `existing` at the clamped index. Duplicates
/// are kept as distinct entries.
pub fn plan_insertion(
    existing: &[Question],
    new_questions: Vec<Question>,
    requested_index: i64,
) -> InsertionPlan {
    let insert_index = clamp_insert_index(requested_index, existing.len());

    let mut merged_questions = Vec::with_capacity(existing.len() + new_questions.len());
    merged_questions.extend_from_slice(&existing[..insert_index]);
    merged_questions.extend(new_questions.iter().cloned());
    merged_questions.extend_from_slice(&existing[insert_index..]);

    InsertionPlan {
        preview_questions: new_questions,
        merged_questions,
        insert_index,
    }
}
