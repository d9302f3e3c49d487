use serde::Serialize;

use crate::models::domain::Question;

/// Streaming wire event. A stream is any number of `Chunk`s followed by
/// exactly one `Complete` or `Error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GenerationEvent {
    Chunk {
        content: String,
    },
    Complete {
        questions: Vec<Question>,
        markdown: String,
        raw_response: String,
    },
    Error {
        message: String,
    },
}

impl GenerationEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GenerationEvent::Chunk { .. })
    }

    /// One NDJSON line, newline included.
    pub fn to_ndjson_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}
