use std::fmt;

use serde::{Deserialize, Serialize};

/// Answer tokens that count as `True` for true/false questions.
const TRUTHY_TOKENS: [&str; 4] = ["true", "t", "1", "yes"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum QuestionKind {
    Mcq,
    ShortAnswer,
    TrueFalse,
    Essay,
}

impl QuestionKind {
    /// Rendering and grading order.
    pub const ALL: [QuestionKind; 4] = [
        QuestionKind::Mcq,
        QuestionKind::ShortAnswer,
        QuestionKind::TrueFalse,
        QuestionKind::Essay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Mcq => "mcq",
            QuestionKind::ShortAnswer => "short_answer",
            QuestionKind::TrueFalse => "true_false",
            QuestionKind::Essay => "essay",
        }
    }

    /// Strict lookup by canonical label.
    pub fn from_canonical(label: &str) -> Option<Self> {
        QuestionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == label)
    }

    /// Lenient lookup used on backend output and stored data. Unknown labels
    /// become `ShortAnswer`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "mcq" | "mcqs" | "multiple_choice" | "multiple_choice_question" | "multiple choice" => {
                QuestionKind::Mcq
            }
            "true_false" | "truefalse" | "tf" | "true/false" | "true or false" => {
                QuestionKind::TrueFalse
            }
            "essay" | "long_answer" | "longanswer" => QuestionKind::Essay,
            _ => QuestionKind::ShortAnswer,
        }
    }
}

impl From<String> for QuestionKind {
    fn from(label: String) -> Self {
        QuestionKind::parse(&label)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical question record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub kind: QuestionKind,
    pub text: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl Question {
    pub fn new(kind: QuestionKind, text: &str) -> Self {
        Question {
            kind,
            text: collapse_whitespace(text),
            options: None,
            answer: None,
            explanation: None,
            reference: None,
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = clean_options(options.into_iter().map(Into::into));
        self
    }

    pub fn with_answer(mut self, answer: &str) -> Self {
        self.answer = non_empty(Some(answer));
        self
    }

    pub fn with_explanation(mut self, explanation: &str) -> Self {
        self.explanation = non_empty(Some(explanation));
        self
    }

    pub fn with_reference(mut self, reference: &str) -> Self {
        self.reference = non_empty(Some(reference));
        self
    }

    /// Boolean reading of the answer for true/false questions.
    pub fn true_false_answer(&self) -> bool {
        self.answer.as_deref().map(is_truthy).unwrap_or(false)
    }
}

/// Loosely shaped question as it arrives from callers or the generation
/// backend, before normalization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl QuestionDraft {
    /// Normalizes the draft. Returns `None` when no usable text remains.
    pub fn into_question(self) -> Option<Question> {
        let text = collapse_whitespace(self.text.as_deref().unwrap_or_default());
        if text.is_empty() {
            return None;
        }

        let kind = self
            .kind
            .as_deref()
            .map(QuestionKind::parse)
            .unwrap_or(QuestionKind::ShortAnswer);

        Some(Question {
            kind,
            text,
            options: self.options.and_then(clean_options),
            answer: non_empty(self.answer.as_deref()),
            explanation: non_empty(self.explanation.as_deref()),
            reference: non_empty(self.reference.as_deref()),
        })
    }
}

impl From<Question> for QuestionDraft {
    fn from(question: Question) -> Self {
        QuestionDraft {
            kind: Some(question.kind.as_str().to_string()),
            text: Some(question.text),
            options: question.options,
            answer: question.answer,
            explanation: question.explanation,
            reference: question.reference,
        }
    }
}

pub fn is_truthy(answer: &str) -> bool {
    let token = answer.trim().to_lowercase();
    TRUTHY_TOKENS.contains(&token.as_str())
}

pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn clean_options(options: impl IntoIterator<Item = String>) -> Option<Vec<String>> {
    let cleaned: Vec<String> = options
        .into_iter()
        .map(|option| option.trim().to_string())
        .filter(|option| !option.is_empty())
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parse_accepts_aliases_and_coerces_unknown() {
        assert_eq!(QuestionKind::parse("MCQ"), QuestionKind::Mcq);
        assert_eq!(QuestionKind::parse("multiple_choice"), QuestionKind::Mcq);
        assert_eq!(QuestionKind::parse(" TF "), QuestionKind::TrueFalse);
        assert_eq!(QuestionKind::parse("long_answer"), QuestionKind::Essay);
        assert_eq!(QuestionKind::parse("short-answer"), QuestionKind::ShortAnswer);
        assert_eq!(QuestionKind::parse("matching"), QuestionKind::ShortAnswer);
    }

    #[test]
    fn kind_serializes_as_snake_case_and_deserializes_leniently() {
        let json = serde_json::to_string(&QuestionKind::TrueFalse).expect("kind should serialize");
        assert_eq!(json, "\"true_false\"");

        let parsed: QuestionKind =
            serde_json::from_str("\"Essay\"").expect("kind should deserialize");
        assert_eq!(parsed, QuestionKind::Essay);

        let unknown: QuestionKind =
            serde_json::from_str("\"fill_in\"").expect("unknown kind should coerce");
        assert_eq!(unknown, QuestionKind::ShortAnswer);
    }

    #[test]
    fn kinds_order_matches_rendering_order() {
        let mut kinds = vec![
            QuestionKind::Essay,
            QuestionKind::TrueFalse,
            QuestionKind::Mcq,
            QuestionKind::ShortAnswer,
        ];
        kinds.sort();
        assert_eq!(kinds, QuestionKind::ALL.to_vec());
    }

    #[test]
    fn draft_without_text_is_dropped() {
        let draft = QuestionDraft {
            kind: Some("mcq".into()),
            text: Some("   \n ".into()),
            ..Default::default()
        };
        assert!(draft.into_question().is_none());
    }

    #[test]
    fn draft_normalizes_optional_fields() {
        let draft = QuestionDraft {
            kind: None,
            text: Some("  What   is\tosmosis? ".into()),
            options: Some(vec!["".into(), " A ".into()]),
            answer: Some("  ".into()),
            explanation: Some(" Because. ".into()),
            reference: Some("Page 4".into()),
        };

        let question = draft.into_question().expect("draft has text");
        assert_eq!(question.kind, QuestionKind::ShortAnswer);
        assert_eq!(question.text, "What is osmosis?");
        assert_eq!(question.options, Some(vec!["A".to_string()]));
        assert_eq!(question.answer, None);
        assert_eq!(question.explanation.as_deref(), Some("Because."));
        assert_eq!(question.reference.as_deref(), Some("Page 4"));
    }

    #[test]
    fn truthy_tokens_are_case_insensitive() {
        for token in ["True", "t", "1", "YES", " yes "] {
            assert!(is_truthy(token), "{token} should be truthy");
        }
        for token in ["false", "no", "0", "", "maybe"] {
            assert!(!is_truthy(token), "{token} should not be truthy");
        }
    }

    #[test]
    fn true_false_answer_defaults_to_false() {
        let question = Question::new(QuestionKind::TrueFalse, "Water is wet.");
        assert!(!question.true_false_answer());
        assert!(question.with_answer("T").true_false_answer());
    }
}
