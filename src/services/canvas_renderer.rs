//! Markdown quiz export in the layout Canvas imports.
//!
//! Output is a pure function of its inputs: the same questions, label and
//! point values always render to the same bytes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::errors::AppResult;
use crate::models::domain::question::collapse_whitespace;
use crate::models::domain::question_set::export_file_name;
use crate::models::domain::{Question, QuestionKind};

const OPTION_PLACEHOLDER: &str = "—";
const OPTION_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

static HYPHEN_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-{2,}").expect("HYPHEN_RUN is a valid regex pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointValues {
    pub mcq: u32,
    pub short_answer: u32,
    pub true_false: u32,
    pub essay: u32,
}

impl Default for PointValues {
    fn default() -> Self {
        Self {
            mcq: 3,
            short_answer: 4,
            true_false: 2,
            essay: 5,
        }
    }
}

impl PointValues {
    /// Merges caller overrides over these values. Keys are canonical kind
    /// labels; anything else is ignored.
    pub fn with_overrides(mut self, overrides: &HashMap<String, u32>) -> Self {
        for (key, points) in overrides {
            match QuestionKind::from_canonical(key) {
                Some(QuestionKind::Mcq) => self.mcq = *points,
                Some(QuestionKind::ShortAnswer) => self.short_answer = *points,
                Some(QuestionKind::TrueFalse) => self.true_false = *points,
                Some(QuestionKind::Essay) => self.essay = *points,
                None => log::debug!("Ignoring point override for unknown kind '{}'", key),
            }
        }
        self
    }

    pub fn for_kind(&self, kind: QuestionKind) -> u32 {
        match kind {
            QuestionKind::Mcq => self.mcq,
            QuestionKind::ShortAnswer => self.short_answer,
            QuestionKind::TrueFalse => self.true_false,
            QuestionKind::Essay => self.essay,
        }
    }
}

fn section_title(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::Mcq => "Multiple Choice Questions (MCQ)",
        QuestionKind::ShortAnswer => "Short Answer Questions",
        QuestionKind::TrueFalse => "True/False Questions (T/F)",
        QuestionKind::Essay => "Essay Questions",
    }
}

pub fn render_canvas_markdown(prompt: &str, questions: &[Question], points: &PointValues) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut number = 1usize;

    for kind in QuestionKind::ALL {
        let bucket: Vec<&Question> = questions.iter().filter(|q| q.kind == kind).collect();
        if bucket.is_empty() {
            continue;
        }

        lines.push(format!(
            "### {} - {} points each\n",
            section_title(kind),
            points.for_kind(kind)
        ));
        for question in bucket {
            lines.extend(format_question(number, question));
            lines.push(String::new());
            number += 1;
        }
    }

    let mut output = String::new();
    let label = comment_safe(&collapse_whitespace(prompt));
    if !label.is_empty() {
        output.push_str(&format!("<!-- Prompt: {} -->\n", label));
    }

    let body = lines.join("\n");
    let body = body.trim_end();
    if !body.is_empty() {
        output.push_str(body);
        output.push('\n');
    }

    if output.is_empty() {
        output.push('\n');
    }
    output
}

fn format_question(number: usize, question: &Question) -> Vec<String> {
    let text = collapse_whitespace(&question.text);
    let mut out = match question.kind {
        QuestionKind::Mcq => {
            let options = four_options(question.options.as_deref());
            let letter = answer_letter(&options, question.answer.as_deref());
            let mut out = vec![format!("**{}. {}**", number, text)];
            out.extend(
                options
                    .iter()
                    .zip(OPTION_LETTERS)
                    .map(|(option, letter)| format!("{}) {}", letter.to_ascii_lowercase(), option)),
            );
            out.push(format!("**Answer:** {}", letter));
            out
        }
        QuestionKind::ShortAnswer => {
            let answer = collapse_whitespace(question.answer.as_deref().unwrap_or_default());
            vec![
                format!("**{}. {}**", number, text),
                format!("**Answer:** {}", answer),
            ]
        }
        QuestionKind::TrueFalse => {
            let answer = if question.true_false_answer() {
                "True"
            } else {
                "False"
            };
            vec![
                format!("**{}. T/F: {}**", number, text),
                format!("**Answer:** {}", answer),
            ]
        }
        QuestionKind::Essay => vec![
            format!("**{}. {}**", number, text),
            "**Answer:**".to_string(),
        ],
    };

    if let Some(explanation) =
        compose_explanation(question.explanation.as_deref(), question.reference.as_deref())
    {
        out.push(format!("**Explanation:** {}", explanation));
    }
    out
}

/// Exactly four cleaned options, padded with a placeholder or truncated.
fn four_options(options: Option<&[String]>) -> Vec<String> {
    let mut cleaned: Vec<String> = options
        .unwrap_or_default()
        .iter()
        .map(|option| collapse_whitespace(option))
        .filter(|option| !option.is_empty())
        .take(OPTION_LETTERS.len())
        .collect();

    cleaned.resize(OPTION_LETTERS.len(), OPTION_PLACEHOLDER.to_string());
    cleaned
}

/// Letter answers are taken as-is; otherwise the answer text is matched
/// against the options. Falls back to `A`.
fn answer_letter(options: &[String], answer: Option<&str>) -> char {
    let Some(answer) = answer else {
        return 'A';
    };

    let trimmed = answer.trim();
    let mut chars = trimmed.chars();
    if let (Some(first), None) = (chars.next(), chars.next()) {
        let upper = first.to_ascii_uppercase();
        if OPTION_LETTERS.contains(&upper) {
            return upper;
        }
    }

    let wanted = canonical(answer);
    options
        .iter()
        .position(|option| canonical(option) == wanted)
        .map(|index| OPTION_LETTERS[index])
        .unwrap_or('A')
}

/// HTML comments may not contain `--`.
fn comment_safe(label: &str) -> String {
    HYPHEN_RUN.replace_all(label, "-").into_owned()
}

fn canonical(value: &str) -> String {
    collapse_whitespace(value).to_lowercase()
}

fn compose_explanation(explanation: Option<&str>, reference: Option<&str>) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(explanation) = explanation.map(collapse_whitespace).filter(|e| !e.is_empty()) {
        parts.push(explanation);
    }
    if let Some(reference) = reference.map(collapse_whitespace).filter(|r| !r.is_empty()) {
        parts.push(format!("(Ref: {})", reference));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Writes `question_set_<id>.md` under `dir`, creating the directory.
pub async fn save_canvas_markdown(
    dir: &Path,
    set_id: i64,
    prompt: &str,
    questions: &[Question],
    points: &PointValues,
) -> AppResult<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(export_file_name(set_id));
    let content = render_canvas_markdown(prompt, questions, points);
    tokio::fs::write(&path, content).await?;

    log::info!("Wrote canvas export for question set {} to {}", set_id, path.display());
    Ok(path)
}
