use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    config::Config,
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{Question, QuestionSet, QuestionSetSummary},
};

const QUESTION_SET_SEQUENCE: &str = "question_set_id";

/// Persistent store of question sets. Each write is atomic per set.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionSetRepository: Send + Sync {
    /// Summaries ordered newest first, ties broken by descending id.
    async fn list(&self) -> AppResult<Vec<QuestionSetSummary>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<QuestionSet>>;
    /// Allocates the next id and stores the set with its questions.
    async fn create(&self, prompt: String, questions: Vec<Question>) -> AppResult<QuestionSet>;
    /// Replaces every question of the set, and the prompt when given.
    /// Returns `None` when the set does not exist.
    async fn replace_questions(
        &self,
        id: i64,
        prompt: Option<String>,
        questions: Vec<Question>,
    ) -> AppResult<Option<QuestionSet>>;
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

/// Orders summaries newest first, then by descending id.
pub fn sort_summaries(summaries: &mut [QuestionSetSummary]) {
    summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

pub struct MongoQuestionSetRepository {
    collection: Collection<QuestionSet>,
    counters: Collection<Document>,
}

impl MongoQuestionSetRepository {
    pub fn new(db: &Database, config: &Config) -> Self {
        Self {
            collection: db.get_collection(&config.question_sets_collection),
            counters: db.get_collection(&config.counters_collection),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for question sets collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;

        log::info!("Successfully created indexes for question sets collection");
        Ok(())
    }

    async fn next_id(&self) -> AppResult<i64> {
        let counter = self
            .counters
            .find_one_and_update(
                doc! { "_id": QUESTION_SET_SEQUENCE },
                doc! { "$inc": { "seq": 1_i64 } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| {
                AppError::DatabaseError("question set id counter was not returned".to_string())
            })?;

        counter
            .get_i64("seq")
            .map_err(|e| AppError::DatabaseError(format!("invalid id counter: {}", e)))
    }
}

#[async_trait]
impl QuestionSetRepository for MongoQuestionSetRepository {
    async fn list(&self) -> AppResult<Vec<QuestionSetSummary>> {
        let cursor = self.collection.find(doc! {}).await?;
        let sets: Vec<QuestionSet> = cursor.try_collect().await?;

        let mut summaries: Vec<QuestionSetSummary> = sets.iter().map(QuestionSet::summary).collect();
        sort_summaries(&mut summaries);
        Ok(summaries)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<QuestionSet>> {
        let set = self.collection.find_one(doc! { "id": id }).await?;
        Ok(set)
    }

    async fn create(&self, prompt: String, questions: Vec<Question>) -> AppResult<QuestionSet> {
        let id = self.next_id().await?;
        let set = QuestionSet {
            id,
            prompt,
            created_at: Utc::now(),
            questions,
        };

        self.collection.insert_one(&set).await?;
        log::info!(
            "Stored question set {} with {} questions",
            set.id,
            set.questions.len()
        );
        Ok(set)
    }

    async fn replace_questions(
        &self,
        id: i64,
        prompt: Option<String>,
        questions: Vec<Question>,
    ) -> AppResult<Option<QuestionSet>> {
        let Some(mut set) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(prompt) = prompt {
            set.prompt = prompt;
        }
        set.questions = questions;

        let result = self.collection.replace_one(doc! { "id": id }, &set).await?;
        if result.matched_count == 0 {
            return Ok(None);
        }

        log::info!(
            "Replaced questions of set {} ({} questions)",
            set.id,
            set.questions.len()
        );
        Ok(Some(set))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        if result.deleted_count > 0 {
            log::info!("Deleted question set {}", id);
        }
        Ok(result.deleted_count > 0)
    }
}
