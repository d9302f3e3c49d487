use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::dto::{
        request::{GenerateQuestionsRequest, InsertionPreviewRequest},
        response::{GenerateQuestionsResponse, InsertionPreviewResponse},
        GenerationEvent,
    },
    repositories::QuestionSetRepository,
    services::{
        canvas_renderer::{render_canvas_markdown, PointValues},
        insertion_planner::plan_insertion,
        model_service::GenerationClient,
        prompt_composer::{compose_messages, ChatMessage, PromptConfig},
        quota_grammar::derive_quota,
        response_normalizer::normalize_response,
    },
};

pub type GenerationEventStream = Pin<Box<dyn Stream<Item = GenerationEvent> + Send>>;

pub struct QuestionGenerationService {
    client: Arc<dyn GenerationClient>,
    repository: Arc<dyn QuestionSetRepository>,
    prompt_config: PromptConfig,
}

impl QuestionGenerationService {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        repository: Arc<dyn QuestionSetRepository>,
        prompt_config: PromptConfig,
    ) -> Self {
        Self {
            client,
            repository,
            prompt_config,
        }
    }

    /// Generates questions in one request/response round trip.
    pub async fn generate(
        &self,
        request: GenerateQuestionsRequest,
    ) -> AppResult<GenerateQuestionsResponse> {
        let messages = self.prepare(&request)?;
        let raw = self.client.complete(&messages).await?;
        finish(&request.instructions, raw)
    }

    /// Same as `generate`, but relays backend text as `Chunk` events while it
    /// arrives. Ends with exactly one `Complete` or `Error` event. No request
    /// is sent until the stream is polled.
    pub fn stream_generate(&self, request: GenerateQuestionsRequest) -> GenerationEventStream {
        let client = Arc::clone(&self.client);
        let prepared = self.prepare(&request);

        Box::pin(async_stream::stream! {
            let messages = match prepared {
                Ok(messages) => messages,
                Err(e) => {
                    yield GenerationEvent::Error { message: e.to_string() };
                    return;
                }
            };

            let mut fragments = match client.stream(&messages).await {
                Ok(fragments) => fragments,
                Err(e) => {
                    log::warn!("Could not open generation stream: {}", e);
                    yield GenerationEvent::Error { message: e.to_string() };
                    return;
                }
            };

            let mut raw = String::new();
            while let Some(fragment) = fragments.next().await {
                match fragment {
                    Ok(text) if text.is_empty() => continue,
                    Ok(text) => {
                        raw.push_str(&text);
                        yield GenerationEvent::Chunk { content: text };
                    }
                    Err(e) => {
                        log::warn!("Generation stream failed after {} bytes: {}", raw.len(), e);
                        yield GenerationEvent::Error { message: e.to_string() };
                        return;
                    }
                }
            }

            match finish(&request.instructions, raw) {
                Ok(response) => yield GenerationEvent::Complete {
                    questions: response.questions,
                    markdown: response.markdown,
                    raw_response: response.raw_response,
                },
                Err(e) => yield GenerationEvent::Error { message: e.to_string() },
            }
        })
    }

    /// Generates questions for an existing set and shows where they would
    /// land. Nothing is written.
    pub async fn preview_insertion(
        &self,
        set_id: i64,
        request: InsertionPreviewRequest,
    ) -> AppResult<InsertionPreviewResponse> {
        let set = self
            .repository
            .find_by_id(set_id)
            .await?
            .ok_or(AppError::SetNotFound(set_id))?;

        let generated = self.generate(request.generation).await?;
        let requested_index = request
            .insert_index
            .unwrap_or_else(|| i64::try_from(set.questions.len()).unwrap_or(i64::MAX));
        let plan = plan_insertion(&set.questions, generated.questions, requested_index);

        log::info!(
            "Previewed {} new questions at index {} of set {}",
            plan.preview_questions.len(),
            plan.insert_index,
            set_id
        );

        Ok(InsertionPreviewResponse {
            set_id,
            preview_questions: plan.preview_questions,
            merged_questions: plan.merged_questions,
            insert_index: plan.insert_index,
            raw_response: generated.raw_response,
        })
    }

    fn prepare(&self, request: &GenerateQuestionsRequest) -> AppResult<Vec<ChatMessage>> {
        request.validate()?;

        let quota = derive_quota(&request.instructions);
        if quota.has_kinds() {
            log::debug!("Derived quota from instructions: {}", quota.summary());
        }

        let messages = compose_messages(&self.prompt_config, request, &quota);
        log::debug!("Composed {} messages for generation", messages.len());
        Ok(messages)
    }
}

fn finish(instructions: &str, raw: String) -> AppResult<GenerateQuestionsResponse> {
    log::debug!("Received {} bytes from generation backend", raw.len());

    let questions = normalize_response(&raw).map_err(|e| {
        match &e {
            AppError::GenerationRefused(reason) => {
                log::warn!("Generation backend declined the request: {}", reason)
            }
            other => log::warn!("Could not use generation response: {}", other),
        }
        e
    })?;

    log::info!("Generated {} questions", questions.len());
    let markdown = render_canvas_markdown(instructions, &questions, &PointValues::default());

    Ok(GenerateQuestionsResponse {
        questions,
        markdown,
        raw_response: raw,
    })
}
