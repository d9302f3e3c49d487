use std::collections::HashMap;

use serde::Deserialize;
use validator::Validate;

use crate::models::domain::QuestionDraft;

/// Free-text generation request coming from the instructor.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct GenerateQuestionsRequest {
    #[validate(length(min = 5))]
    pub instructions: String,

    #[serde(default)]
    pub context: Option<String>,

    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    pub question_count: Option<u32>,

    #[serde(default)]
    pub question_types: Option<Vec<String>>,
}

impl GenerateQuestionsRequest {
    pub fn new(instructions: &str) -> Self {
        GenerateQuestionsRequest {
            instructions: instructions.to_string(),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: &str) -> Self {
        self.context = Some(context.to_string());
        self
    }

    pub fn with_question_count(mut self, count: u32) -> Self {
        self.question_count = Some(count);
        self
    }

    pub fn with_question_types(mut self, types: &[&str]) -> Self {
        self.question_types = Some(types.iter().map(|t| t.to_string()).collect());
        self
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InsertionPreviewRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub generation: GenerateQuestionsRequest,

    /// Zero-based position; out-of-range values are clamped.
    #[serde(default)]
    pub insert_index: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionSetRequest {
    #[validate(length(min = 3))]
    pub prompt: String,

    #[validate(length(min = 1))]
    pub questions: Vec<QuestionDraft>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuestionSetRequest {
    #[validate(length(min = 3))]
    #[serde(default)]
    pub prompt: Option<String>,

    #[validate(length(min = 1))]
    pub questions: Vec<QuestionDraft>,
}

/// Point overrides for the canvas export, keyed by canonical kind label.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CanvasExportParams {
    pub mcq: Option<u32>,
    pub short_answer: Option<u32>,
    pub true_false: Option<u32>,
    pub essay: Option<u32>,
}

impl CanvasExportParams {
    pub fn overrides(&self) -> HashMap<String, u32> {
        [
            ("mcq", self.mcq),
            ("short_answer", self.short_answer),
            ("true_false", self.true_false),
            ("essay", self.essay),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|points| (key.to_string(), points)))
        .collect()
    }
}
