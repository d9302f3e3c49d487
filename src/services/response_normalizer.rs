use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::errors::{AppError, AppResult};
use crate::models::domain::{Question, QuestionDraft};

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```(?:json)?\s*(.*?)\s*```$").expect("CODE_FENCE is a valid regex pattern")
});

/// Parses the full backend text into canonical questions.
///
/// Entries that are not objects or carry no usable text are dropped. A
/// top-level `{"error": ...}` object is the backend declining the request and
/// surfaces as `GenerationRefused`.
pub fn normalize_response(raw: &str) -> AppResult<Vec<Question>> {
    let cleaned = strip_code_fence(raw);
    let payload: Value =
        serde_json::from_str(cleaned).map_err(|e| AppError::MalformedResponse(e.to_string()))?;

    if let Some(reason) = refusal_reason(&payload) {
        return Err(AppError::GenerationRefused(reason));
    }

    let entries = match &payload {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("questions") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(AppError::MalformedResponse(
                    "response did not include a 'questions' list".to_string(),
                ))
            }
        },
        _ => {
            return Err(AppError::MalformedResponse(
                "response must be a JSON object or array".to_string(),
            ))
        }
    };

    let total = entries.len();
    let questions: Vec<Question> = entries
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|entry| draft_from_entry(entry).into_question())
        .collect();

    if questions.is_empty() {
        return Err(AppError::EmptyResult);
    }

    if questions.len() < total {
        log::debug!(
            "Dropped {} of {} generated entries during normalization",
            total - questions.len(),
            total
        );
    }

    Ok(questions)
}

/// Removes one fenced code block wrapping the whole response, if present.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    CODE_FENCE
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
        .map(|body| body.as_str())
        .unwrap_or(raw)
}

fn refusal_reason(payload: &Value) -> Option<String> {
    let map = payload.as_object()?;
    if map.contains_key("questions") {
        return None;
    }
    match map.get("error")? {
        Value::String(reason) => Some(reason.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn draft_from_entry(entry: &Map<String, Value>) -> QuestionDraft {
    QuestionDraft {
        kind: first_text(entry, &["kind", "type"]),
        text: first_text(entry, &["text", "question"]),
        options: entry.get("options").and_then(string_list),
        answer: first_scalar(entry, &["answer", "solution"]),
        explanation: first_text(entry, &["explanation", "rationale"]),
        reference: first_text(entry, &["reference", "source"]),
    }
}

/// First key holding a non-blank string.
fn first_text(entry: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| entry.get(*key).and_then(Value::as_str))
        .find(|value| !value.trim().is_empty())
        .map(str::to_string)
}

/// Like `first_text`, but booleans and numbers are accepted as answers too.
fn first_scalar(entry: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| match entry.get(*key)? {
            Value::String(value) if !value.trim().is_empty() => Some(value.clone()),
            Value::Bool(value) => Some(value.to_string()),
            Value::Number(value) => Some(value.to_string()),
            _ => None,
        })
        .next()
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}
