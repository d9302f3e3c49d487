use crate::models::domain::{Question, QuestionKind};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    pub fn mcq_question(text: &str, options: &[&str], answer: &str) -> Question {
        Question::new(QuestionKind::Mcq, text)
            .with_options(options.iter().copied())
            .with_answer(answer)
    }

    pub fn short_answer_question(text: &str, answer: &str) -> Question {
        Question::new(QuestionKind::ShortAnswer, text).with_answer(answer)
    }

    pub fn true_false_question(text: &str, answer: &str) -> Question {
        Question::new(QuestionKind::TrueFalse, text).with_answer(answer)
    }

    pub fn essay_question(text: &str) -> Question {
        Question::new(QuestionKind::Essay, text)
    }

    /// One question of every kind, deliberately out of rendering order.
    pub fn sample_questions() -> Vec<Question> {
        vec![
            true_false_question("Plants release oxygen.", "true"),
            mcq_question(
                "Which organelle performs photosynthesis?",
                &["Mitochondria", "Chloroplast", "Nucleus", "Ribosome"],
                "Chloroplast",
            )
            .with_explanation("Chloroplasts contain chlorophyll.")
            .with_reference("Chapter 2"),
            short_answer_question("Name the gas plants absorb.", "Carbon dioxide"),
            essay_question("Describe the light-dependent reactions."),
        ]
    }

    /// Backend payload in the shape the question writer is asked to return.
    pub fn generated_payload(questions: &[Question]) -> String {
        serde_json::json!({ "questions": questions }).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::QuestionKind;
    use crate::services::response_normalizer::normalize_response;

    #[test]
    fn test_fixtures_sample_questions_cover_every_kind() {
        let questions = sample_questions();
        for kind in QuestionKind::ALL {
            assert!(questions.iter().any(|q| q.kind == kind), "missing {kind}");
        }
    }

    #[test]
    fn test_fixtures_generated_payload_normalizes_back() {
        let questions = sample_questions();
        let normalized = normalize_response(&generated_payload(&questions))
            .expect("payload should normalize");
        assert_eq!(normalized, questions);
    }
}
