use serde::Serialize;

use crate::constants::prompts::{
    CONTEXT_GROUNDING_NOTE, OPEN_COUNT_GUIDANCE, OPEN_TYPE_GUIDANCE, QUESTION_SCHEMA_BLOCK,
    QUESTION_WRITER_SYSTEM_PROMPT, QUOTA_EXCLUSIVITY_NOTE, REFUSAL_CONTRACT,
};
use crate::models::domain::Quota;
use crate::models::dto::request::GenerateQuestionsRequest;

const DEFAULT_MAX_CONTEXT_CHARS: usize = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Immutable prompt settings, built once from `Config` and passed in on every
/// composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptConfig {
    pub system_prompt: String,
    pub schema_block: String,
    pub max_context_chars: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_prompt: QUESTION_WRITER_SYSTEM_PROMPT.to_string(),
            schema_block: QUESTION_SCHEMA_BLOCK.to_string(),
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
        }
    }
}

impl PromptConfig {
    pub fn with_context_char_limit(mut self, limit: usize) -> Self {
        self.max_context_chars = limit;
        self
    }
}

/// Builds the system + user messages for one generation request.
///
/// Type guidance: explicit type list, then derived quota, then open-ended.
/// Count guidance: explicit count, then derived total, then open-ended.
pub fn compose_messages(
    config: &PromptConfig,
    request: &GenerateQuestionsRequest,
    quota: &Quota,
) -> Vec<ChatMessage> {
    let explicit_types = request
        .question_types
        .as_deref()
        .filter(|types| !types.is_empty());
    let quota_drives_types = explicit_types.is_none() && quota.has_kinds();

    let type_instruction = match explicit_types {
        Some(types) => format!(
            "The instructor prefers the following question types (use these labels when possible): {}.",
            types.join(", ")
        ),
        None if quota_drives_types => format!(
            "You must generate exactly these question counts/types: {}. Use only the labels mcq, short_answer, true_false, or essay.",
            quota.summary()
        ),
        None => OPEN_TYPE_GUIDANCE.to_string(),
    };

    let count_instruction = match (request.question_count, quota.total) {
        (Some(count), _) => format!("Generate exactly {} questions.", count),
        (None, Some(total)) if quota_drives_types => format!(
            "Generate exactly {} questions total, matching the per-type counts above.",
            total
        ),
        (None, Some(total)) => format!("Generate exactly {} questions.", total),
        (None, None) => OPEN_COUNT_GUIDANCE.to_string(),
    };

    let mut constraint_note = REFUSAL_CONTRACT.to_string();
    if quota_drives_types {
        constraint_note.push(' ');
        constraint_note.push_str(QUOTA_EXCLUSIVITY_NOTE);
    }

    let mut sections = vec![
        request.instructions.trim().to_string(),
        String::new(),
        type_instruction,
        count_instruction,
        String::new(),
        config.schema_block.clone(),
    ];

    if let Some(context) = capped_context(request.context.as_deref(), config.max_context_chars) {
        sections.push(String::new());
        sections.push("Context:".to_string());
        sections.push(context);
    }

    sections.push(String::new());
    sections.push(format!("{} {}", CONTEXT_GROUNDING_NOTE, constraint_note));

    vec![
        ChatMessage::system(config.system_prompt.clone()),
        ChatMessage::user(sections.join("\n")),
    ]
}

/// Trims and truncates context to the character budget. Empty context yields
/// `None`.
fn capped_context(context: Option<&str>, max_chars: usize) -> Option<String> {
    let trimmed = context?.trim();
    if trimmed.is_empty() || max_chars == 0 {
        return None;
    }
    Some(trimmed.chars().take(max_chars).collect())
}
