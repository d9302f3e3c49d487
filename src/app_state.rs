use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoQuestionSetRepository, QuestionSetRepository},
    services::{
        model_service::{GenerationClient, OpenAiGenerationClient},
        question_generation_service::QuestionGenerationService,
        question_set_service::QuestionSetService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub question_set_service: Arc<QuestionSetService>,
    pub generation_service: Arc<QuestionGenerationService>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let repository = Arc::new(MongoQuestionSetRepository::new(&db, &config));
        repository.ensure_indexes().await?;

        let client = Arc::new(OpenAiGenerationClient::new(&config));

        Ok(Self::from_parts(config, client, repository))
    }

    /// Wires services over an already built client and repository.
    pub fn from_parts(
        config: Config,
        client: Arc<dyn GenerationClient>,
        repository: Arc<dyn QuestionSetRepository>,
    ) -> Self {
        let question_set_service = Arc::new(QuestionSetService::new(
            Arc::clone(&repository),
            config.canvas_export_dir.clone(),
        ));
        let generation_service = Arc::new(QuestionGenerationService::new(
            client,
            repository,
            config.prompt_config(),
        ));

        Self {
            question_set_service,
            generation_service,
        }
    }
}
