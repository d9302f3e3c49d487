pub const QUESTION_WRITER_SYSTEM_PROMPT: &str = "You are an experienced instructor who writes exam-ready questions. Only produce valid JSON. Avoid commentary outside JSON.";

pub const QUESTION_SCHEMA_BLOCK: &str = r#"Return JSON with this shape:
{
  "questions": [
    {
      "kind": "mcq | short_answer | true_false | essay",
      "text": "Question text",
      "options": ["optional list of options"],
      "answer": "short answer or letter",
      "explanation": "why the answer is correct",
      "reference": "source citation"
    }
  ]
}"#;

pub const OPEN_TYPE_GUIDANCE: &str =
    "Feel free to use mcq, short_answer, true_false, or essay question types.";

pub const OPEN_COUNT_GUIDANCE: &str = "Generate only the requested questions.";

pub const REFUSAL_CONTRACT: &str = "If you cannot satisfy the requested counts/types, respond with a JSON error object like {\"error\": \"reason\"} instead of returning questions.";

pub const QUOTA_EXCLUSIVITY_NOTE: &str =
    "Do not output question types that were not explicitly requested.";

pub const CONTEXT_GROUNDING_NOTE: &str = "Ensure answers reflect the context.";
