use std::pin::Pin;
use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use secrecy::ExposeSecret;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    services::prompt_composer::{ChatMessage, ChatRole},
};

/// Incremental text fragments from the backend, in arrival order.
pub type TextStream = Pin<Box<dyn Stream<Item = AppResult<String>> + Send>>;

/// Chat-completion backend used by question generation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Sends the messages and returns the full response text.
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String>;

    /// Sends the messages and yields response text as it arrives. The stream
    /// is lazy: nothing is requested until the caller polls.
    async fn stream(&self, messages: &[ChatMessage]) -> AppResult<TextStream>;
}

/// OpenAI-compatible backend. Works against LiteLLM or any proxy exposing the
/// chat completions API through `LLM_API_BASE`.
pub struct OpenAiGenerationClient {
    client: Option<Client<OpenAIConfig>>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    use_completion_token_limit: bool,
}

impl OpenAiGenerationClient {
    pub fn new(config: &Config) -> Self {
        let client = config.llm_api_key.as_ref().map(|key| {
            let mut openai_config = OpenAIConfig::new().with_api_key(key.expose_secret());
            if let Some(base) = &config.llm_api_base {
                openai_config = openai_config.with_api_base(base);
            }
            Client::with_config(openai_config).with_backoff(no_retry())
        });

        if client.is_none() {
            log::warn!("No LLM API key configured; generation requests will be rejected");
        }

        Self {
            client,
            model: config.llm_model.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
            use_completion_token_limit: config.uses_completion_token_limit(),
        }
    }

    fn client(&self) -> AppResult<&Client<OpenAIConfig>> {
        self.client.as_ref().ok_or(AppError::MissingCredentials)
    }

    #[allow(deprecated)]
    fn build_request(&self, messages: &[ChatMessage]) -> AppResult<CreateChatCompletionRequest> {
        let messages = messages
            .iter()
            .map(to_request_message)
            .collect::<AppResult<Vec<_>>>()?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature);

        if self.use_completion_token_limit {
            builder.max_completion_tokens(self.max_tokens);
        } else {
            builder.max_tokens(self.max_tokens);
        }

        Ok(builder.build()?)
    }
}

/// Backend failures are reported to the caller on the first attempt.
fn no_retry() -> backoff::ExponentialBackoff {
    backoff::ExponentialBackoff {
        max_elapsed_time: Some(Duration::ZERO),
        ..Default::default()
    }
}

fn to_request_message(message: &ChatMessage) -> AppResult<ChatCompletionRequestMessage> {
    let converted = match message.role {
        ChatRole::System => ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(message.content.as_str())
                .build()?,
        ),
        ChatRole::User => ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(message.content.as_str())
                .build()?,
        ),
    };
    Ok(converted)
}

#[async_trait]
impl GenerationClient for OpenAiGenerationClient {
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String> {
        let client = self.client()?;
        let request = self.build_request(messages)?;

        log::debug!("Requesting completion from model {}", self.model);
        let response = client.chat().create(request).await.map_err(|e| {
            log::warn!("Generation request failed: {}", e);
            AppError::from(e)
        })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(content)
    }

    async fn stream(&self, messages: &[ChatMessage]) -> AppResult<TextStream> {
        let client = self.client()?;
        let request = self.build_request(messages)?;

        log::debug!("Opening completion stream from model {}", self.model);
        let upstream = client.chat().create_stream(request).await?;

        let fragments = upstream.map(|chunk| -> AppResult<String> {
            let chunk = chunk?;
            Ok(chunk
                .choices
                .into_iter()
                .filter_map(|choice| choice.delta.content)
                .collect())
        });

        Ok(Box::pin(fragments))
    }
}
