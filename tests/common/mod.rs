#![allow(dead_code)]

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use futures::stream;
use tokio::sync::{Mutex, RwLock};

use instructor_assistant_server::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Question, QuestionSet, QuestionSetSummary},
    repositories::{question_set_repository::sort_summaries, QuestionSetRepository},
    services::{
        model_service::{GenerationClient, TextStream},
        prompt_composer::ChatMessage,
    },
};

pub struct InMemoryQuestionSetRepository {
    sets: Arc<RwLock<HashMap<i64, QuestionSet>>>,
    next_id: Mutex<i64>,
}

impl InMemoryQuestionSetRepository {
    pub fn new() -> Self {
        Self {
            sets: Arc::new(RwLock::new(HashMap::new())),
            next_id: Mutex::new(0),
        }
    }
}

#[async_trait]
impl QuestionSetRepository for InMemoryQuestionSetRepository {
    async fn list(&self) -> AppResult<Vec<QuestionSetSummary>> {
        let sets = self.sets.read().await;
        let mut summaries: Vec<_> = sets.values().map(QuestionSet::summary).collect();
        sort_summaries(&mut summaries);
        Ok(summaries)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<QuestionSet>> {
        let sets = self.sets.read().await;
        Ok(sets.get(&id).cloned())
    }

    async fn create(&self, prompt: String, questions: Vec<Question>) -> AppResult<QuestionSet> {
        let id = {
            let mut next_id = self.next_id.lock().await;
            *next_id += 1;
            *next_id
        };

        let set = QuestionSet {
            id,
            prompt,
            created_at: Utc::now(),
            questions,
        };
        self.sets.write().await.insert(id, set.clone());
        Ok(set)
    }

    async fn replace_questions(
        &self,
        id: i64,
        prompt: Option<String>,
        questions: Vec<Question>,
    ) -> AppResult<Option<QuestionSet>> {
        let mut sets = self.sets.write().await;
        let Some(set) = sets.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(prompt) = prompt {
            set.prompt = prompt;
        }
        set.questions = questions;
        Ok(Some(set.clone()))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.sets.write().await.remove(&id).is_some())
    }
}

/// Generation backend that replays a fixed response, split into fragments
/// when streamed.
pub struct ScriptedGenerationClient {
    response: Result<String, AppError>,
    fragment_len: usize,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedGenerationClient {
    pub fn replying(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            fragment_len: 16,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: AppError) -> Self {
        Self {
            response: Err(error),
            fragment_len: 16,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub async fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().await.clone()
    }

    fn fragments(&self, text: &str) -> Vec<String> {
        text.chars()
            .collect::<Vec<_>>()
            .chunks(self.fragment_len)
            .map(|chunk| chunk.iter().collect())
            .collect()
    }
}

#[async_trait]
impl GenerationClient for ScriptedGenerationClient {
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String> {
        self.calls.lock().await.push(messages.to_vec());
        self.response.clone()
    }

    async fn stream(&self, messages: &[ChatMessage]) -> AppResult<TextStream> {
        self.calls.lock().await.push(messages.to_vec());
        let text = self.response.clone()?;
        let items: Vec<AppResult<String>> = self.fragments(&text).into_iter().map(Ok).collect();
        let fragments: TextStream = Box::pin(stream::iter(items));
        Ok(fragments)
    }
}

pub fn temp_export_dir() -> PathBuf {
    std::env::temp_dir().join(format!("canvas-exports-{}", uuid::Uuid::new_v4()))
}

pub fn test_config(export_dir: PathBuf) -> Config {
    let mut config = Config::from_env();
    config.llm_api_key = None;
    config.canvas_export_dir = export_dir;
    config
}
