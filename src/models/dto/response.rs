use serde::Serialize;

use crate::models::domain::{Question, QuestionSet, QuestionSetSummary};

#[derive(Debug, Clone, Serialize)]
pub struct GenerateQuestionsResponse {
    pub questions: Vec<Question>,
    pub markdown: String,
    pub raw_response: String,
}

/// Non-committing view of a merge. The caller commits by replacing the set's
/// questions with `merged_questions`.
#[derive(Debug, Clone, Serialize)]
pub struct InsertionPreviewResponse {
    pub set_id: i64,
    pub preview_questions: Vec<Question>,
    pub merged_questions: Vec<Question>,
    pub insert_index: usize,
    pub raw_response: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionSetHeader {
    pub id: i64,
    pub prompt: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas_md_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionSetDetail {
    pub question_set: QuestionSetHeader,
    pub questions: Vec<Question>,
}

impl QuestionSetDetail {
    pub fn from_set(set: QuestionSet, canvas_md_path: Option<String>) -> Self {
        QuestionSetDetail {
            question_set: QuestionSetHeader {
                id: set.id,
                prompt: set.prompt,
                created_at: set.created_at.to_rfc3339(),
                canvas_md_path,
            },
            questions: set.questions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionSetListResponse {
    pub question_sets: Vec<QuestionSetSummary>,
}
