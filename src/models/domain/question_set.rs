use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::question::Question;

/// Ordered collection of questions. Insertion order is display and grading
/// order.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionSet {
    pub id: i64,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(id: i64, prompt: &str, questions: Vec<Question>) -> Self {
        QuestionSet {
            id,
            prompt: prompt.to_string(),
            created_at: Utc::now(),
            questions,
        }
    }

    pub fn summary(&self) -> QuestionSetSummary {
        QuestionSetSummary {
            id: self.id,
            prompt: self.prompt.clone(),
            created_at: self.created_at,
            question_count: self.questions.len(),
        }
    }
}

pub fn export_file_name(set_id: i64) -> String {
    format!("question_set_{}.md", set_id)
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionSetSummary {
    pub id: i64,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
    pub question_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::question::QuestionKind;

    #[test]
    fn summary_counts_questions() {
        let set = QuestionSet::new(
            4,
            "Cell biology",
            vec![
                Question::new(QuestionKind::Mcq, "Q1"),
                Question::new(QuestionKind::Essay, "Q2"),
            ],
        );

        let summary = set.summary();
        assert_eq!(summary.id, 4);
        assert_eq!(summary.question_count, 2);
        assert_eq!(summary.prompt, "Cell biology");
    }

    #[test]
    fn export_file_name_uses_set_id() {
        assert_eq!(export_file_name(12), "question_set_12.md");
    }

    #[test]
    fn question_set_round_trips_through_json() {
        let set = QuestionSet::new(
            1,
            "Photosynthesis",
            vec![Question::new(QuestionKind::TrueFalse, "Plants need light.").with_answer("t")],
        );

        let json = serde_json::to_string(&set).expect("set should serialize");
        let parsed: QuestionSet = serde_json::from_str(&json).expect("set should deserialize");
        assert_eq!(parsed, set);
    }
}
