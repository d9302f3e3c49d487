use std::path::PathBuf;
use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Question, QuestionDraft, QuestionSet},
        dto::{
            request::{CanvasExportParams, CreateQuestionSetRequest, UpdateQuestionSetRequest},
            response::{QuestionSetDetail, QuestionSetListResponse},
        },
    },
    repositories::QuestionSetRepository,
    services::canvas_renderer::{render_canvas_markdown, save_canvas_markdown, PointValues},
};

pub struct QuestionSetService {
    repository: Arc<dyn QuestionSetRepository>,
    export_dir: PathBuf,
}

impl QuestionSetService {
    pub fn new(repository: Arc<dyn QuestionSetRepository>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            repository,
            export_dir: export_dir.into(),
        }
    }

    pub async fn list(&self) -> AppResult<QuestionSetListResponse> {
        let question_sets = self.repository.list().await?;
        Ok(QuestionSetListResponse { question_sets })
    }

    pub async fn get(&self, id: i64) -> AppResult<QuestionSetDetail> {
        let set = self.find(id).await?;
        Ok(QuestionSetDetail::from_set(set, None))
    }

    pub async fn create(&self, request: CreateQuestionSetRequest) -> AppResult<QuestionSetDetail> {
        request.validate()?;
        let questions = normalize_drafts(request.questions)?;

        let set = self
            .repository
            .create(request.prompt.trim().to_string(), questions)
            .await?;

        let canvas_md_path = self.export(&set).await;
        Ok(QuestionSetDetail::from_set(set, canvas_md_path))
    }

    /// Replaces all questions of a set, and its prompt when one is given.
    pub async fn update(
        &self,
        id: i64,
        request: UpdateQuestionSetRequest,
    ) -> AppResult<QuestionSetDetail> {
        self.find(id).await?;

        request.validate()?;
        let questions = normalize_drafts(request.questions)?;

        let prompt = request.prompt.map(|p| p.trim().to_string());
        let set = self
            .repository
            .replace_questions(id, prompt, questions)
            .await?
            .ok_or(AppError::SetNotFound(id))?;

        let canvas_md_path = self.export(&set).await;
        Ok(QuestionSetDetail::from_set(set, canvas_md_path))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::SetNotFound(id))
        }
    }

    /// Renders the set's canvas markdown with optional point overrides.
    pub async fn canvas_markdown(&self, id: i64, params: &CanvasExportParams) -> AppResult<String> {
        let set = self.find(id).await?;
        let points = PointValues::default().with_overrides(&params.overrides());
        Ok(render_canvas_markdown(&set.prompt, &set.questions, &points))
    }

    async fn find(&self, id: i64) -> AppResult<QuestionSet> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AppError::SetNotFound(id))
    }

    /// Export failures never fail the write that triggered them.
    async fn export(&self, set: &QuestionSet) -> Option<String> {
        match save_canvas_markdown(
            &self.export_dir,
            set.id,
            &set.prompt,
            &set.questions,
            &PointValues::default(),
        )
        .await
        {
            Ok(path) => Some(path.display().to_string()),
            Err(e) => {
                log::warn!("Canvas export for question set {} failed: {}", set.id, e);
                None
            }
        }
    }
}

fn normalize_drafts(drafts: Vec<QuestionDraft>) -> AppResult<Vec<Question>> {
    let questions: Vec<Question> = drafts
        .into_iter()
        .filter_map(QuestionDraft::into_question)
        .collect();

    if questions.is_empty() {
        return Err(AppError::ValidationError("No questions supplied.".to_string()));
    }
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::question_set_repository::MockQuestionSetRepository;
    use crate::test_utils::fixtures::*;

    fn export_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("question-set-service-{}-{}", tag, std::process::id()))
    }

    fn drafts(questions: Vec<Question>) -> Vec<QuestionDraft> {
        questions.into_iter().map(QuestionDraft::from).collect()
    }

    #[tokio::test]
    async fn test_create_rejects_drafts_without_text() {
        let mut repository = MockQuestionSetRepository::new();
        repository.expect_create().never();
        let service = QuestionSetService::new(Arc::new(repository), export_dir("blank"));

        let request = CreateQuestionSetRequest {
            prompt: "Midterm".to_string(),
            questions: vec![QuestionDraft {
                text: Some("   ".to_string()),
                ..Default::default()
            }],
        };

        match service.create(request).await {
            Err(AppError::ValidationError(message)) => {
                assert_eq!(message, "No questions supplied.")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_exports_canvas_file() {
        let dir = export_dir("create");
        let mut repository = MockQuestionSetRepository::new();
        repository
            .expect_create()
            .times(1)
            .returning(|prompt, questions| Ok(QuestionSet::new(11, &prompt, questions)));
        let service = QuestionSetService::new(Arc::new(repository), dir.clone());

        let detail = service
            .create(CreateQuestionSetRequest {
                prompt: "  Photosynthesis quiz ".to_string(),
                questions: drafts(sample_questions()),
            })
            .await
            .expect("create should succeed");

        assert_eq!(detail.question_set.prompt, "Photosynthesis quiz");
        let path = detail
            .question_set
            .canvas_md_path
            .expect("export path should be attached");
        assert!(path.ends_with("question_set_11.md"));
        assert!(dir.join("question_set_11.md").exists());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_update_missing_set_is_not_found() {
        let mut repository = MockQuestionSetRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));
        repository.expect_replace_questions().never();
        let service = QuestionSetService::new(Arc::new(repository), export_dir("missing"));

        let result = service
            .update(
                4,
                UpdateQuestionSetRequest {
                    prompt: None,
                    questions: drafts(vec![essay_question("E")]),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::SetNotFound(4))));
    }

    #[tokio::test]
    async fn test_delete_missing_set_is_not_found() {
        let mut repository = MockQuestionSetRepository::new();
        repository.expect_delete().returning(|_| Ok(false));
        let service = QuestionSetService::new(Arc::new(repository), export_dir("delete"));

        assert!(matches!(
            service.delete(8).await,
            Err(AppError::SetNotFound(8))
        ));
    }

    #[tokio::test]
    async fn test_canvas_markdown_applies_point_overrides() {
        let mut repository = MockQuestionSetRepository::new();
        repository
            .expect_find_by_id()
            .returning(|id| Ok(Some(QuestionSet::new(id, "Unit 2", vec![essay_question("E")]))));
        let service = QuestionSetService::new(Arc::new(repository), export_dir("canvas"));

        let params = CanvasExportParams {
            essay: Some(12),
            ..Default::default()
        };
        let markdown = service
            .canvas_markdown(2, &params)
            .await
            .expect("set exists");

        assert!(markdown.contains("### Essay Questions - 12 points each"));
        assert!(markdown.starts_with("<!-- Prompt: Unit 2 -->"));
    }
}
